//! Header view model.
//!
//! The site header shows who is signed in. All display decisions are made
//! here so the template only prints precomputed strings.

use crate::models::CurrentUser;

/// Precomputed header state for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderView {
    /// No user in the session; the header shows a sign-in link.
    SignedOut,
    /// A user is signed in; the header shows their identity and a
    /// sign-out button.
    SignedIn {
        /// Display name when the account has one, email otherwise.
        label: String,
        /// Profile photo URL, if the account has one.
        avatar_url: Option<String>,
        /// Uppercased first character of the label, shown when there is
        /// no photo; `?` when the label has no characters.
        initial: String,
    },
}

impl HeaderView {
    /// Build the header state from the session user, if any.
    #[must_use]
    pub fn from_session(user: Option<&CurrentUser>) -> Self {
        user.map_or(Self::SignedOut, |user| {
            let label = user
                .display_name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map_or_else(|| user.email.as_str().to_owned(), str::to_owned);

            let initial = initial_of(&label);

            Self::SignedIn {
                label,
                avatar_url: user.photo_url.clone(),
                initial,
            }
        })
    }

    /// Whether a user is signed in.
    #[must_use]
    pub const fn is_signed_in(&self) -> bool {
        matches!(self, Self::SignedIn { .. })
    }

    /// The display label, empty when signed out.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::SignedOut => "",
            Self::SignedIn { label, .. } => label,
        }
    }

    /// The avatar URL, if signed in with a profile photo.
    #[must_use]
    pub fn avatar_url(&self) -> Option<&str> {
        match self {
            Self::SignedOut => None,
            Self::SignedIn { avatar_url, .. } => avatar_url.as_deref(),
        }
    }

    /// The fallback initial, empty when signed out.
    #[must_use]
    pub fn initial(&self) -> &str {
        match self {
            Self::SignedOut => "",
            Self::SignedIn { initial, .. } => initial,
        }
    }
}

/// Uppercased first character of the label, or `?` when empty.
fn initial_of(label: &str) -> String {
    label
        .chars()
        .next()
        .map_or_else(|| "?".to_owned(), |c| c.to_uppercase().to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use questvault_core::{Email, UserId};

    fn current_user(display_name: Option<&str>, photo_url: Option<&str>) -> CurrentUser {
        CurrentUser {
            id: UserId::new(uuid::Uuid::new_v4()),
            email: Email::parse("grimnir@example.com").unwrap(),
            display_name: display_name.map(str::to_owned),
            photo_url: photo_url.map(str::to_owned),
        }
    }

    #[test]
    fn test_signed_out_when_no_session_user() {
        let view = HeaderView::from_session(None);
        assert_eq!(view, HeaderView::SignedOut);
        assert!(!view.is_signed_in());
    }

    #[test]
    fn test_prefers_display_name() {
        let user = current_user(Some("Grimnir"), Some("https://example.com/me.png"));
        let view = HeaderView::from_session(Some(&user));

        let HeaderView::SignedIn {
            label,
            avatar_url,
            initial,
        } = view
        else {
            panic!("expected signed-in header");
        };
        assert_eq!(label, "Grimnir");
        assert_eq!(avatar_url.as_deref(), Some("https://example.com/me.png"));
        assert_eq!(initial, "G");
    }

    #[test]
    fn test_falls_back_to_email_for_blank_name() {
        let user = current_user(Some("   "), None);
        let HeaderView::SignedIn { label, initial, .. } = HeaderView::from_session(Some(&user))
        else {
            panic!("expected signed-in header");
        };
        assert_eq!(label, "grimnir@example.com");
        assert_eq!(initial, "G");
    }

    #[test]
    fn test_initial_question_mark_when_label_empty() {
        assert_eq!(initial_of(""), "?");
        assert_eq!(initial_of("grimnir"), "G");
        assert_eq!(initial_of("ßeta"), "SS");
    }

    #[test]
    fn test_falls_back_to_email_when_name_absent() {
        let user = current_user(None, None);
        let HeaderView::SignedIn { label, .. } = HeaderView::from_session(Some(&user)) else {
            panic!("expected signed-in header");
        };
        assert_eq!(label, "grimnir@example.com");
    }
}
