use shared::{Navigator, Screen};

use crate::Route;

impl From<Screen> for Route {
    fn from(screen: Screen) -> Self {
        match screen {
            Screen::Login => Route::Login,
            Screen::Register => Route::Register,
            Screen::Home => Route::Home,
        }
    }
}

/// Adapts the yew-router history to the login flow's navigation capability.
#[derive(Clone)]
pub struct RouterNavigator(yew_router::navigator::Navigator);

impl RouterNavigator {
    pub fn new(navigator: yew_router::navigator::Navigator) -> Self {
        Self(navigator)
    }
}

impl Navigator for RouterNavigator {
    fn replace(&self, screen: Screen) {
        log::debug!("replace -> {}", screen.as_str());
        self.0.replace(&Route::from(screen));
    }

    fn navigate(&self, screen: Screen) {
        log::debug!("push -> {}", screen.as_str());
        self.0.push(&Route::from(screen));
    }
}
