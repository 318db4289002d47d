//! Panel state structure and transition planning

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Overlay panels of the site. `None` means the home view is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Panel {
    #[default]
    None,
    Leaderboard,
    Garage,
    Tune,
    Calculator,
    Rules,
}

impl Panel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Panel::None => "none",
            Panel::Leaderboard => "leaderboard",
            Panel::Garage => "garage",
            Panel::Tune => "tune",
            Panel::Calculator => "calculator",
            Panel::Rules => "rules",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Panel::None)
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Panel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Panel::None),
            "leaderboard" => Ok(Panel::Leaderboard),
            "garage" => Ok(Panel::Garage),
            "tune" => Ok(Panel::Tune),
            "calculator" => Ok(Panel::Calculator),
            "rules" => Ok(Panel::Rules),
            _ => Err(Error::UnknownPanel(s.to_string())),
        }
    }
}

/// Which panel is visible and whether its exit animation is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PanelState {
    pub active: Panel,
    pub closing: bool,
}

/// What the router has to do to honour a navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelStep {
    /// Already showing (or heading to) the requested panel
    Unchanged,
    /// Nothing is open, show the target right away
    Show(Panel),
    /// The request points back at the visible panel, drop the armed transition
    CancelPending,
    /// Start the exit animation and switch once the delay elapses
    Schedule(Panel),
}

impl PanelState {
    /// Create the initial state: home view, no animation
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan `open(target)` given the target of the currently armed transition
    pub fn plan_open(&self, pending: Option<Panel>, target: Panel) -> PanelStep {
        let heading = pending.unwrap_or(self.active);
        if target == heading {
            return PanelStep::Unchanged;
        }
        if pending.is_some() && target == self.active {
            return PanelStep::CancelPending;
        }
        if self.active.is_none() && pending.is_none() {
            return PanelStep::Show(target);
        }
        PanelStep::Schedule(target)
    }

    /// Plan `close()`; closing from the home view is suppressed
    pub fn plan_close(&self, pending: Option<Panel>) -> PanelStep {
        self.plan_open(pending, Panel::None)
    }

    /// Visibility of the surrounding page elements for this state
    pub fn chrome(&self) -> Chrome {
        let home = self.active.is_none();
        Chrome {
            player_controls_visible: home,
            help_button_visible: home,
            backdrop_visible: !home,
            navbar_dimmed: self.active == Panel::Rules,
        }
    }
}

/// Page elements whose visibility follows the active panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chrome {
    /// Radio controls fade out under panels, playback keeps going
    pub player_controls_visible: bool,
    pub help_button_visible: bool,
    /// Click-to-close overlay under an open panel
    pub backdrop_visible: bool,
    /// Navigation bar is blurred while the rules modal is up
    pub navbar_dimmed: bool,
}
