// Department Domain Model

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Service department. Each one owns a token prefix letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Department {
    CivilRegistration,
    LicensesPermits,
    Treasury,
    DriverServices,
    VehicleServices,
}

impl Department {
    pub const ALL: [Department; 5] = [
        Department::CivilRegistration,
        Department::LicensesPermits,
        Department::Treasury,
        Department::DriverServices,
        Department::VehicleServices,
    ];

    /// Stable identifier (`civil-registration`, ...)
    pub fn id(&self) -> &'static str {
        match self {
            Department::CivilRegistration => "civil-registration",
            Department::LicensesPermits => "licenses-permits",
            Department::Treasury => "treasury",
            Department::DriverServices => "driver-services",
            Department::VehicleServices => "vehicle-services",
        }
    }

    /// Token prefix letter
    pub fn prefix(&self) -> char {
        match self {
            Department::CivilRegistration => 'A',
            Department::LicensesPermits => 'B',
            Department::Treasury => 'C',
            Department::DriverServices => 'D',
            Department::VehicleServices => 'V',
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Department::CivilRegistration => "Civil Registration",
            Department::LicensesPermits => "Licenses & Permits",
            Department::Treasury => "Treasury Department",
            Department::DriverServices => "Driver Services",
            Department::VehicleServices => "Vehicle Services",
        }
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Department {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Department::ALL
            .into_iter()
            .find(|d| d.id() == s)
            .ok_or_else(|| DomainError::UnknownDepartment(s.to_string()))
    }
}
