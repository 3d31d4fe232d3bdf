//! CSS selectors for the lesson application's `data-test` hooks.

// Player
pub const NEXT_ENABLED: &str = "button[data-test='player-next']:not([disabled])";
pub const CHALLENGE_HEADER: &str = "[data-test='challenge-header']";
pub const TOGGLE_KEYBOARD: &str = "[data-test='player-toggle-keyboard']";

// Challenges
pub const TAP_TOKEN: &str = "[data-test='challenge-tap-token']";
pub const TAP_TOKEN_ENABLED: &str = "[data-test='challenge-tap-token']:not([disabled])";
pub const MATCH_BUTTON: &str = "button";
pub const CHOICE: &str = "[data-test='challenge-choice']";
pub const CHOICE_ENABLED: &str = "[data-test='challenge-choice'][aria-disabled='false']";
pub const CHOICE_CARD: &str = "[data-test='challenge-choice-card']";
pub const CHOICE_CARD_ENABLED: &str = "[data-test='challenge-choice-card'][aria-disabled='false']";
pub const TRANSLATE_PROMPT: &str = "[data-test='challenge-translate-prompt']";
pub const TRANSLATE_INPUT: &str = "[data-test='challenge-translate-input']";
pub const TRANSLATE_INPUT_ENABLED: &str = "[data-test='challenge-translate-input']:not([disabled])";
pub const WORD_BANK: &str = "[data-test='word-bank']";

// Login
pub const HAVE_ACCOUNT: &str = "[data-test='have-account']";
pub const EMAIL_INPUT: &str = "[data-test='email-input']";
pub const PASSWORD_INPUT: &str = "[data-test='password-input']";
pub const LOGIN_BUTTON: &str = "[data-test='register-button']";

// Skill tree
pub const START_LESSON: &str = "[data-test='start-lesson']";
pub const BACK_ARROW: &str = "[data-test='back-arrow']";
pub const SKILL_TREE: &str = "[data-test='skill-tree']";
pub const TREE_SECTION: &str = "[data-test='tree-section']";
// Matched on `data-test` like every other control, not `data-tests`.
pub const CLOSE_BANNER: &str = "[data-test='close-banner']";
pub const NOTIFICATION_NO_THANKS: &str = "[data-test='notification-drawer-no-thanks-button']";
pub const INTRO_LESSON: &str = "[data-test='intro-lesson']";
pub const SKILL_START_BUTTON: &str = "[data-test='start-button']";
pub const CHECKPOINT_BADGE: &str = "[data-test='checkpoint-badge']";
pub const CHECKPOINT_START_BUTTON: &str = "[data-test='checkpoint-start-button']";

/// The `position`-th (1-based) element matching `base` among its siblings.
pub fn nth_child(base: &str, position: usize) -> String {
    format!("{base}:nth-child({position})")
}
