//! Headless model of the wallet's screen flow.
//!
//! The app is a navigation stack of six screens:
//! Splash → Onboarding → WalletSetup → {ImportWallet | CreateWallet} → WalletHome.
//! [`Navigator`] drives that stack from [`Event`]s. Only the top screen has
//! local state (slide index, import form), and that state is dropped whenever
//! the top screen changes.

use crate::error::FlowError;
use crate::report::Report;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// How long the splash screen stays up.
pub const SPLASH_DELAY: Duration = Duration::from_millis(2000);

/// Placeholder phrase shown on the create-wallet screen. Never generated.
pub const PLACEHOLDER_SEED_PHRASE: &str =
    "abandon ability able about above absent absorb abstract absurd abuse access accident";

/// One onboarding slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slide {
    /// Headline.
    pub title: &'static str,
    /// Gradient subtitle.
    pub subtitle: &'static str,
}

/// Onboarding slides in display order.
pub const SLIDES: [Slide; 3] = [
    Slide {
        title: "Property",
        subtitle: "Diversity",
    },
    Slide {
        title: "Safe",
        subtitle: "Security",
    },
    Slide {
        title: "Convenient",
        subtitle: "Transaction",
    },
];

/// A screen in the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Screen {
    /// Logo with a timer.
    Splash,
    /// Three-slide introduction.
    Onboarding,
    /// Import or create choice.
    WalletSetup,
    /// Seed phrase import form.
    ImportWallet,
    /// Placeholder seed phrase display.
    CreateWallet,
    /// Balance and actions.
    WalletHome,
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Screen::Splash => "Splash",
            Screen::Onboarding => "Onboarding",
            Screen::WalletSetup => "WalletSetup",
            Screen::ImportWallet => "ImportWallet",
            Screen::CreateWallet => "CreateWallet",
            Screen::WalletHome => "WalletHome",
        };
        write!(f, "{}", name)
    }
}

/// Fields of the import form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportField {
    /// Seed phrase input.
    SeedPhrase,
    /// New password input.
    Password,
    /// Password confirmation input.
    ConfirmPassword,
}

impl FromStr for ImportField {
    type Err = FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "seed" => Ok(ImportField::SeedPhrase),
            "password" => Ok(ImportField::Password),
            "confirm-password" => Ok(ImportField::ConfirmPassword),
            other => Err(FlowError::UnknownEvent(format!("field {}", other))),
        }
    }
}

/// Ephemeral state of the import screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportForm {
    /// Seed phrase as typed.
    pub seed_phrase: String,
    /// New password.
    pub password: String,
    /// Password confirmation.
    pub confirm_password: String,
    /// Whether the seed phrase is shown in clear.
    pub show_seed_phrase: bool,
    /// Whether the password is shown in clear.
    pub show_password: bool,
    /// Whether the confirmation is shown in clear.
    pub show_confirm_password: bool,
    /// Face ID switch.
    pub use_biometric: bool,
}

impl ImportForm {
    fn set(&mut self, field: ImportField, value: String) {
        match field {
            ImportField::SeedPhrase => self.seed_phrase = value,
            ImportField::Password => self.password = value,
            ImportField::ConfirmPassword => self.confirm_password = value,
        }
    }

    fn toggle_visibility(&mut self, field: ImportField) {
        let flag = match field {
            ImportField::SeedPhrase => &mut self.show_seed_phrase,
            ImportField::Password => &mut self.show_password,
            ImportField::ConfirmPassword => &mut self.show_confirm_password,
        };
        *flag = !*flag;
    }

    /// Text as displayed: masked unless its visibility toggle is on.
    pub fn displayed(&self, field: ImportField) -> String {
        let (value, shown) = match field {
            ImportField::SeedPhrase => (&self.seed_phrase, self.show_seed_phrase),
            ImportField::Password => (&self.password, self.show_password),
            ImportField::ConfirmPassword => (&self.confirm_password, self.show_confirm_password),
        };
        if shown {
            value.clone()
        } else {
            "•".repeat(value.chars().count())
        }
    }
}

/// Local state owned by the top screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum LocalState {
    /// No local state.
    None,
    /// Time spent on the splash screen.
    Splash {
        /// Milliseconds elapsed so far.
        #[serde(serialize_with = "serialize_millis")]
        elapsed: Duration,
    },
    /// Onboarding progress.
    Onboarding {
        /// Index into [`SLIDES`].
        slide: usize,
    },
    /// Import form contents.
    Import(ImportForm),
}

impl LocalState {
    fn fresh(screen: Screen) -> Self {
        match screen {
            Screen::Splash => LocalState::Splash {
                elapsed: Duration::ZERO,
            },
            Screen::Onboarding => LocalState::Onboarding { slide: 0 },
            Screen::ImportWallet => LocalState::Import(ImportForm::default()),
            _ => LocalState::None,
        }
    }
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

/// Input to the navigator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Time passes on the current screen.
    Elapsed(Duration),
    /// Onboarding "Next" / "Get Started".
    Next,
    /// "Import Using Seed Phrase".
    ChooseImport,
    /// "Create a New Wallet".
    ChooseCreate,
    /// Header back arrow.
    Back,
    /// Type into an import field.
    Edit(ImportField, String),
    /// Eye icon next to an import field.
    ToggleVisibility(ImportField),
    /// Face ID switch.
    ToggleBiometric,
    /// "Import".
    ConfirmImport,
    /// "I've Saved My Seed Phrase".
    ConfirmSeedSaved,
}

impl Event {
    /// Short name used in errors and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Event::Elapsed(_) => "wait",
            Event::Next => "next",
            Event::ChooseImport => "import",
            Event::ChooseCreate => "create",
            Event::Back => "back",
            Event::Edit(..) => "edit",
            Event::ToggleVisibility(_) => "toggle-visibility",
            Event::ToggleBiometric => "toggle-biometric",
            Event::ConfirmImport => "confirm-import",
            Event::ConfirmSeedSaved => "confirm-seed-saved",
        }
    }
}

impl FromStr for Event {
    type Err = FlowError;

    /// Parse an event name. `wait` means the full splash delay. Form events
    /// name a field (`seed`, `password`, `confirm-password`):
    /// `edit:<field>=<text>` and `toggle-visibility:<field>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(arg) = s.strip_prefix("edit:") {
            let (field, value) = arg
                .split_once('=')
                .ok_or_else(|| FlowError::UnknownEvent(s.to_string()))?;
            return Ok(Event::Edit(field.parse()?, value.to_string()));
        }
        if let Some(field) = s.strip_prefix("toggle-visibility:") {
            return Ok(Event::ToggleVisibility(field.parse()?));
        }
        match s {
            "wait" => Ok(Event::Elapsed(SPLASH_DELAY)),
            "next" => Ok(Event::Next),
            "import" => Ok(Event::ChooseImport),
            "create" => Ok(Event::ChooseCreate),
            "back" => Ok(Event::Back),
            "toggle-biometric" => Ok(Event::ToggleBiometric),
            "confirm-import" => Ok(Event::ConfirmImport),
            "confirm-seed-saved" => Ok(Event::ConfirmSeedSaved),
            other => Err(FlowError::UnknownEvent(other.to_string())),
        }
    }
}

/// Navigation stack plus the top screen's local state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Navigator {
    stack: Vec<Screen>,
    local: LocalState,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    /// Start on the splash screen.
    pub fn new() -> Self {
        Self {
            stack: vec![Screen::Splash],
            local: LocalState::fresh(Screen::Splash),
        }
    }

    /// The visible screen.
    pub fn current(&self) -> Screen {
        self.stack.last().copied().unwrap_or(Screen::Splash)
    }

    /// Screens from bottom to top.
    pub fn stack(&self) -> &[Screen] {
        &self.stack
    }

    /// Local state of the visible screen.
    pub fn local(&self) -> &LocalState {
        &self.local
    }

    /// Go to `screen`. If it is already in the stack, pop back to it.
    fn navigate(&mut self, screen: Screen) {
        match self.stack.iter().position(|s| *s == screen) {
            Some(i) => self.stack.truncate(i + 1),
            None => self.stack.push(screen),
        }
        self.local = LocalState::fresh(screen);
    }

    fn unhandled(&self, event: &Event) -> FlowError {
        FlowError::Unhandled {
            screen: self.current().to_string(),
            event: event.name().to_string(),
        }
    }

    /// Apply an event and return the visible screen afterwards.
    pub fn handle(&mut self, event: Event) -> Result<Screen, FlowError> {
        let target = match (self.current(), event) {
            (_, Event::Back) => {
                if self.stack.len() < 2 {
                    return Err(self.unhandled(&Event::Back));
                }
                self.stack.pop();
                self.local = LocalState::fresh(self.current());
                None
            }
            (Screen::Splash, Event::Elapsed(d)) => match &mut self.local {
                LocalState::Splash { elapsed } => {
                    *elapsed += d;
                    (*elapsed >= SPLASH_DELAY).then_some(Screen::Onboarding)
                }
                _ => None,
            },
            (_, Event::Elapsed(_)) => None,
            (Screen::Onboarding, Event::Next) => match &mut self.local {
                LocalState::Onboarding { slide } if *slide + 1 < SLIDES.len() => {
                    *slide += 1;
                    None
                }
                _ => Some(Screen::WalletSetup),
            },
            (Screen::WalletSetup, Event::ChooseImport) => Some(Screen::ImportWallet),
            (Screen::WalletSetup, Event::ChooseCreate) => Some(Screen::CreateWallet),
            (
                Screen::ImportWallet,
                event @ (Event::Edit(..) | Event::ToggleVisibility(_) | Event::ToggleBiometric),
            ) => {
                if let LocalState::Import(form) = &mut self.local {
                    match event {
                        Event::Edit(field, value) => form.set(field, value),
                        Event::ToggleVisibility(field) => form.toggle_visibility(field),
                        _ => form.use_biometric = !form.use_biometric,
                    }
                }
                None
            }
            (Screen::ImportWallet, Event::ConfirmImport) => Some(Screen::WalletHome),
            (Screen::CreateWallet, Event::ConfirmSeedSaved) => Some(Screen::WalletHome),
            (_, event) => return Err(self.unhandled(&event)),
        };

        if let Some(screen) = target {
            self.navigate(screen);
            log::trace!("Screen flow now at {}", screen);
        }
        Ok(self.current())
    }

    /// Text content of the visible screen.
    pub fn view(&self) -> Vec<String> {
        match (self.current(), &self.local) {
            (Screen::Splash, _) => vec!["QNTMEX".to_string(), "WALLET".to_string()],
            (Screen::Onboarding, LocalState::Onboarding { slide }) => {
                let current = SLIDES[*slide];
                let button = if *slide + 1 == SLIDES.len() {
                    "Get Started"
                } else {
                    "Next"
                };
                vec![
                    current.title.to_string(),
                    current.subtitle.to_string(),
                    format!("Slide {} of {}", slide + 1, SLIDES.len()),
                    format!("[{}]", button),
                ]
            }
            (Screen::WalletSetup, _) => vec![
                "Wallet Setup".to_string(),
                "[Import Using Seed Phrase]".to_string(),
                "[Create a New Wallet]".to_string(),
            ],
            (Screen::ImportWallet, LocalState::Import(form)) => vec![
                "Import From Seed".to_string(),
                format!("Seed Phrase: {}", form.displayed(ImportField::SeedPhrase)),
                format!("New Password: {}", form.displayed(ImportField::Password)),
                "Must be at least 8 characters".to_string(),
                format!(
                    "Confirm Password: {}",
                    form.displayed(ImportField::ConfirmPassword)
                ),
                format!(
                    "Sign in with Face ID? {}",
                    if form.use_biometric { "on" } else { "off" }
                ),
                "[Import]".to_string(),
            ],
            (Screen::CreateWallet, _) => {
                let mut lines = vec![
                    "Create New Wallet".to_string(),
                    "Your Seed Phrase".to_string(),
                ];
                lines.extend(seed_words().map(|(i, w)| format!("{:>2}. {}", i, w)));
                lines.push(
                    "Never share your seed phrase. Anyone with these words can access your wallet."
                        .to_string(),
                );
                lines.push("[I've Saved My Seed Phrase]".to_string());
                lines
            }
            (Screen::WalletHome, _) => vec![
                "Wallet Home".to_string(),
                "Your Balance: 0.00 ETH".to_string(),
                "[Receive] [Send] [Swap]".to_string(),
            ],
            (screen, _) => vec![screen.to_string()],
        }
    }
}

/// The placeholder phrase as numbered words, starting at 1.
pub fn seed_words() -> impl Iterator<Item = (usize, &'static str)> {
    PLACEHOLDER_SEED_PHRASE
        .split(' ')
        .enumerate()
        .map(|(i, w)| (i + 1, w))
}

/// Events that walk from the splash screen to the wallet home via create.
pub fn create_path() -> Vec<Event> {
    vec![
        Event::Elapsed(SPLASH_DELAY),
        Event::Next,
        Event::Next,
        Event::Next,
        Event::ChooseCreate,
        Event::ConfirmSeedSaved,
    ]
}

/// Replay events from a fresh navigator, one report section per screen shown.
///
/// Stops at the first event the visible screen does not handle.
pub fn replay(events: impl IntoIterator<Item = Event>) -> Result<Report, FlowError> {
    let mut nav = Navigator::new();
    let mut report = Report::new("QNTMEX Wallet Screens");
    render(&nav, &mut report);
    for event in events {
        let name = event.name();
        nav.handle(event)?;
        report.next_step(format!("{} -> {}", name, nav.current()));
        render(&nav, &mut report);
    }
    Ok(report)
}

fn render(nav: &Navigator, report: &mut Report) {
    report.section(format!("[{}]", nav.current()));
    for line in nav.view() {
        report.info(line);
    }
}
