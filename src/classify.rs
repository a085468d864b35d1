use crate::constants::COVER_MARKER;
use crate::formats::Detection;

/// What a member turned out to be
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// An image that should be transcoded
    Image { mime: String },
    /// An image excluded by the cover policy
    Cover { mime: String },
    /// Anything else, including content whose type could not be determined
    Other,
}

impl Classification {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Classification::Image { .. })
    }

    pub fn mime(&self) -> Option<&str> {
        match self {
            Classification::Image { mime } | Classification::Cover { mime } => Some(mime),
            Classification::Other => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Classification::Image { .. } => "image",
            Classification::Cover { .. } => "cover",
            Classification::Other => "other",
        }
    }
}

/// Classifies an archive member from its name and bytes.
///
/// `Detection::Content` trusts the magic signature, so a renamed image is
/// still found and a misnamed text file is left alone. `Detection::Extension`
/// only looks at the name and never touches `data`.
pub fn classify(name: &str, data: &[u8], detection: Detection) -> Classification {
    let mime = match detection {
        Detection::Content => sniff_mime(data),
        Detection::Extension => guess_mime(name),
    };

    match mime {
        Some(mime) if mime.starts_with("image/") => {
            if is_cover_name(name) {
                Classification::Cover { mime }
            } else {
                Classification::Image { mime }
            }
        }
        _ => Classification::Other,
    }
}

pub fn is_cover_name(name: &str) -> bool {
    name.to_lowercase().contains(COVER_MARKER)
}

fn sniff_mime(data: &[u8]) -> Option<String> {
    image::guess_format(data)
        .ok()
        .map(|format| format.to_mime_type().to_string())
}

fn guess_mime(name: &str) -> Option<String> {
    mime_guess::from_path(name)
        .first()
        .map(|mime| mime.essence_str().to_string())
}
