//! Built-in style presets and instruction resolution.

use serde::Serialize;

/// A named, pre-written editing instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Preset {
    /// Stable identifier.
    pub id: &'static str,
    /// English display name.
    pub name: &'static str,
    /// Arabic display name.
    pub localized_name: &'static str,
    /// Icon glyph shown next to the name.
    pub icon: &'static str,
    /// Instruction sent to the model.
    pub instruction: &'static str,
}

static PRESETS: [Preset; 4] = [
    Preset {
        id: "amna-luxury-campaign",
        name: "Amna Luxury Campaign",
        localized_name: "حملة آمنة الفاخرة",
        icon: "✨",
        instruction: r#"Transform this image into a high-end luxury fashion campaign suitable for professional printing.
Reveal and enhance the model’s face naturally while preserving her real facial features, expression, and identity with no distortion.
Preserve the exact body proportions, pose, and dress design without any modification.
Replace the background with an ultra-luxurious, elegant setting inspired by international fashion brands.
Use refined architectural elements, warm neutral tones, subtle textures, and cinematic soft lighting to create a premium atmosphere.
Add the luxury brand logo "AMNA" in an elegant, refined style. Place the logo in the top-left corner with a prestigious, perfectly balanced layout.
Add the Arabic name "آمنة" subtly underneath the English logo in a smaller minimalist font.
Apply professional editorial retouching:
- Natural high-end skin retouch (no plastic effect)
- Enhanced fabric shine and texture
- Balanced contrast and luxury color grading
- Refined highlights on face and dress
Add subtle premium branding elements: delicate watermark pattern with brand initials, minimal gold or champagne accents.
International luxury fashion campaign aesthetic.
Output & Print Requirements:
- Aspect ratio optimized for print (approx 23.5 × 29.5 cm).
- Ultra-high resolution, sharp details, no noise, no artifacts.
- Clean margins for print safety.
Negative Prompt: No face change, no body modification, no blur, no over-smoothing, no plastic skin, no AI artifacts, no distortion, no exaggerated curves, no extra limbs."#,
    },
    Preset {
        id: "ultra-realistic-upscale",
        name: "4K Pro Upscale",
        localized_name: "ترقية 4K احترافية",
        icon: "💎",
        instruction: r#"Ultra high-resolution 4K upscale, professional luxury fashion photography.
Preserve the model’s exact facial features, identity, skin texture, body proportions, and pose with zero distortion.
Enhance sharpness, fine details, fabric texture, lace edges, and clarity.
Natural skin tones, realistic lighting, soft shadows, cinematic depth.
Maintain the original background or refine it slightly for better clarity.
No face alteration, no body reshaping, no artificial beauty filters.
Print-ready, editorial quality, clean and realistic."#,
    },
    Preset {
        id: "editorial-retouch",
        name: "Editorial Master",
        localized_name: "رتوش المجلات العالمية",
        icon: "📸",
        instruction: r#"Professional editorial retouching while keeping the person and background exactly as they are.
Apply high-end skin retouch (preserving texture), enhance fabric highlights, and perform luxury color grading.
Ensure the image looks like it came from a professional fashion magazine shoot.
High contrast, refined shadows, and cinematic atmosphere."#,
    },
    Preset {
        id: "minimalist-studio",
        name: "Minimalist Background",
        localized_name: "خلفية استوديو راقية",
        icon: "🏛️",
        instruction: r#"Keep the person in the foreground exactly the same.
Change the background to a minimalist, high-end architectural studio setting with warm beige and cream tones.
Soft cinematic lighting from the side, clean surfaces, and an atmosphere of quiet luxury."#,
    },
];

/// Returns the catalog in display order.
pub fn list_presets() -> &'static [Preset] {
    &PRESETS
}

/// Looks up a preset by id.
pub fn find_preset(id: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.id == id)
}

/// Returns the preset selected when the session starts.
pub fn default_preset() -> &'static Preset {
    &PRESETS[0]
}

/// Picks the instruction for a submission.
///
/// Non-blank custom text wins (trimmed). Otherwise the named preset's
/// instruction, falling back to the first preset for unknown ids.
pub fn resolve_instruction(preset_id: &str, custom_text: &str) -> String {
    let custom = custom_text.trim();
    if !custom.is_empty() {
        return custom.to_string();
    }
    find_preset(preset_id)
        .unwrap_or_else(default_preset)
        .instruction
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_four_unique_presets() {
        let presets = list_presets();
        assert_eq!(presets.len(), 4);
        for (i, a) in presets.iter().enumerate() {
            assert!(presets[i + 1..].iter().all(|b| b.id != a.id));
        }
        assert_eq!(default_preset().id, "amna-luxury-campaign");
    }

    #[test]
    fn test_resolve_uses_preset_when_custom_blank() {
        for preset in list_presets() {
            assert_eq!(resolve_instruction(preset.id, ""), preset.instruction);
            assert_eq!(resolve_instruction(preset.id, "  \n\t "), preset.instruction);
        }
    }

    #[test]
    fn test_resolve_prefers_trimmed_custom_text() {
        assert_eq!(
            resolve_instruction("editorial-retouch", "  add a red scarf \n"),
            "add a red scarf"
        );
    }

    #[test]
    fn test_resolve_unknown_preset_falls_back_to_first() {
        assert_eq!(
            resolve_instruction("no-such-preset", ""),
            list_presets()[0].instruction
        );
    }
}
