//! WBS number value object: the (car, project, work package) address.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Address of a WBS element.
///
/// A work package number of `0` addresses the project itself, so
/// `1.4.0` is project 4 of car 1 and `1.4.2` its second work package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WbsNumber {
    pub car_number: u32,
    pub project_number: u32,
    pub work_package_number: u32,
}

impl WbsNumber {
    pub fn new(car_number: u32, project_number: u32, work_package_number: u32) -> Self {
        Self {
            car_number,
            project_number,
            work_package_number,
        }
    }

    /// Returns true if this number addresses a project rather than a work package.
    pub fn is_project(&self) -> bool {
        self.work_package_number == 0
    }

    /// Returns the number of the project this element belongs to.
    pub fn project_key(&self) -> WbsNumber {
        WbsNumber::new(self.car_number, self.project_number, 0)
    }
}

impl fmt::Display for WbsNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}",
            self.car_number, self.project_number, self.work_package_number
        )
    }
}

impl FromStr for WbsNumber {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('.').collect();
        if parts.len() != 3 {
            return Err(ValidationError::invalid_format(
                "wbs_number",
                format!("expected car.project.work_package, got '{}'", s),
            ));
        }

        let mut numbers = [0u32; 3];
        for (slot, part) in numbers.iter_mut().zip(parts) {
            *slot = part.parse().map_err(|_| {
                ValidationError::invalid_format("wbs_number", format!("'{}' is not a number", part))
            })?;
        }

        Ok(WbsNumber::new(numbers[0], numbers[1], numbers[2]))
    }
}
