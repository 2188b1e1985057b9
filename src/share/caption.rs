/// Caption text that goes along with a shared roast
use crate::state::data::RoastResult;

/// Caption for the share sheet / download fallback
pub fn share_caption(result: &RoastResult, link: Option<&str>) -> String {
    let invite = match link {
        Some(link) => format!("Try the Ugly Face Detector: {}", link),
        None => "Try the Ugly Face Detector!".to_string(),
    };
    format!("I got {}% ugliness score! 🤡 {}", result.score(), invite)
}

/// Caption for the "Copy Text" button, includes the roast itself
pub fn copy_caption(result: &RoastResult, link: Option<&str>) -> String {
    let invite = match link {
        Some(link) => format!("Try it: {}", link),
        None => "Try it!".to_string(),
    };
    format!(
        "I got {}% ugliness score! 🤡 {} {}",
        result.score(),
        result.roast_text(),
        invite
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::FilterTag;
    use chrono::Utc;

    fn result() -> RoastResult {
        RoastResult::new(91, "You broke the mirror 🪞", vec![FilterTag::Unibrow], Utc::now())
    }

    #[test]
    fn test_share_caption_with_link() {
        assert_eq!(
            share_caption(&result(), Some("https://example.org")),
            "I got 91% ugliness score! 🤡 Try the Ugly Face Detector: https://example.org"
        );
    }

    #[test]
    fn test_share_caption_without_link() {
        assert_eq!(
            share_caption(&result(), None),
            "I got 91% ugliness score! 🤡 Try the Ugly Face Detector!"
        );
    }

    #[test]
    fn test_copy_caption_includes_roast() {
        assert_eq!(
            copy_caption(&result(), Some("https://example.org")),
            "I got 91% ugliness score! 🤡 You broke the mirror 🪞 Try it: https://example.org"
        );
        assert!(copy_caption(&result(), None).ends_with("Try it!"));
    }
}
