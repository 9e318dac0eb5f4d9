//! Branding records for the shipped studio variants.
//!
//! The variants share every piece of logic; only copy, glyphs and the
//! seeded gallery differ.

use serde::Serialize;

/// Digit system used when rendering dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Numerals {
    /// 0-9.
    Western,
    /// ٠-٩.
    ArabicIndic,
}

impl Numerals {
    /// Rewrites ASCII digits in `text` into this digit system.
    pub fn localize(&self, text: &str) -> String {
        match self {
            Self::Western => text.to_string(),
            Self::ArabicIndic => text
                .chars()
                .map(|c| match c.to_digit(10) {
                    Some(d) => char::from_u32(0x0660 + d).unwrap_or(c),
                    None => c,
                })
                .collect(),
        }
    }
}

/// User-facing strings.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CopyStrings {
    /// Shown when the camera cannot be opened.
    pub camera_error: &'static str,
    /// Shown when an edit fails for any reason other than credentials.
    pub processing_error: &'static str,
    /// Title of the credential dialog.
    pub credential_title: &'static str,
    /// Explains why the professional tier needs a credential.
    pub credential_hint: &'static str,
    /// Author label used when a share has no name.
    pub default_author: &'static str,
}

/// A gallery entry every session starts with.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SeedItem {
    /// Item id.
    pub id: &'static str,
    /// Image URL.
    pub image_url: &'static str,
    /// Display name of the author.
    pub author_name: &'static str,
    /// Pre-rendered date.
    pub created_date: &'static str,
    /// Starting vote count.
    pub vote_count: u32,
}

/// Branding/theme record parameterizing one studio variant.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Branding {
    /// Short machine name; prefixes downloaded file names.
    pub slug: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Latin display name.
    pub latin_name: &'static str,
    /// Single glyph used as the logo.
    pub logo_glyph: &'static str,
    /// Digit system for rendered dates.
    pub numerals: Numerals,
    /// User-facing strings.
    pub copy: CopyStrings,
    /// Gallery contents at session start.
    pub default_gallery: &'static [SeedItem],
}

static SEED_GALLERY: [SeedItem; 2] = [
    SeedItem {
        id: "1",
        image_url: "https://images.unsplash.com/photo-1539109136881-3be0616acf4b?auto=format&fit=crop&w=400&q=80",
        author_name: "سارة الأحمد",
        created_date: "٢٠٢٤/١٢/٠١",
        vote_count: 156,
    },
    SeedItem {
        id: "2",
        image_url: "https://images.unsplash.com/photo-1490481651871-ab68de25d43d?auto=format&fit=crop&w=400&q=80",
        author_name: "نورة السعيد",
        created_date: "٢٠٢٤/١٢/٠٥",
        vote_count: 243,
    },
];

/// The "Nano Banano" studio.
pub static NANO_BANANO: Branding = Branding {
    slug: "nano-banano",
    name: "نانو بنانو",
    latin_name: "NANO BANANO EDITOR",
    logo_glyph: "N",
    numerals: Numerals::ArabicIndic,
    copy: CopyStrings {
        camera_error: "فشل الوصول إلى الكاميرا. يرجى التحقق من الأذونات.",
        processing_error: "حدث خطأ أثناء المعالجة. يرجى المحاولة مرة أخرى.",
        credential_title: "إدارة مفتاح الوصول",
        credential_hint: "مطلوب للوصول إلى النماذج الاحترافية (Gemini 3 Pro)",
        default_author: "مبدع نانو بنانو",
    },
    default_gallery: &SEED_GALLERY,
};

/// The "Amna" fashion studio.
pub static AMNA: Branding = Branding {
    slug: "amna",
    name: "آمنة",
    latin_name: "AMNA STUDIO",
    logo_glyph: "A",
    numerals: Numerals::ArabicIndic,
    copy: CopyStrings {
        camera_error: "تعذر فتح الكاميرا. يرجى السماح بالوصول ثم المحاولة مجددًا.",
        processing_error: "تعذر إكمال التعديل. يرجى المحاولة مرة أخرى.",
        credential_title: "مفتاح الوصول الاحترافي",
        credential_hint: "مطلوب لاستخدام وضع الطباعة الاحترافي (Gemini 3 Pro)",
        default_author: "مبدعة آمنة",
    },
    default_gallery: &SEED_GALLERY,
};

/// Every shipped variant.
pub fn all_brands() -> [&'static Branding; 2] {
    [&NANO_BANANO, &AMNA]
}

/// Finds a variant by slug.
pub fn find_brand(slug: &str) -> Option<&'static Branding> {
    all_brands().into_iter().find(|b| b.slug == slug)
}
