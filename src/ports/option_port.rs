//! Screening option storage port trait.

use crate::domain::error::ScreenerError;
use crate::domain::screening_option::ScreeningOption;

pub trait OptionPort {
    /// All stored options, sorted by name.
    fn list_options(&self) -> Result<Vec<ScreeningOption>, ScreenerError>;

    fn get_option(&self, name: &str) -> Result<Option<ScreeningOption>, ScreenerError> {
        Ok(self.list_options()?.into_iter().find(|o| o.name == name))
    }
}
