use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use crate::item::Accommodation;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TariffMode {
    /// Applies between a start and end date
    Temporary,
    /// Applies from the start date onwards
    Permanent,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MassUpdateAction {
    Tariff {
        mode: TariffMode,
        start_date: NaiveDate,
        #[serde(default)]
        end_date: Option<NaiveDate>,
        new_price: Decimal,
    },
    Block {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MassUpdateRequest {
    pub room_type: String,
    pub destination_ids: Vec<String>,
    pub action: MassUpdateAction,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlannedTarget {
    pub accommodation_id: String,
    pub destination_id: String,
    pub name: String,
    pub current_price: Decimal,
}

/// Accommodations a mass tariff or block update would touch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MassUpdatePlan {
    pub room_type: String,
    pub action: MassUpdateAction,
    pub targets: Vec<PlannedTarget>,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum MassUpdateError {
    #[error("Room type is required")]
    MissingRoomType,

    #[error("Please select at least one destination")]
    NoDestinations,

    #[error("End date {end} is before start date {start}")]
    InvalidDateRange {
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("Temporary tariff needs an end date")]
    MissingEndDate,

    #[error("New price must be greater than zero")]
    InvalidPrice,
}

/// Destinations that offer at least one accommodation of `room_type`, sorted.
pub fn destinations_with_room_type(accommodations: &[Accommodation], room_type: &str) -> Vec<String> {
    accommodations
        .iter()
        .filter(|a| a.room_type.as_deref() == Some(room_type))
        .map(|a| a.destination_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn plan_mass_update(
    accommodations: &[Accommodation],
    request: &MassUpdateRequest,
) -> Result<MassUpdatePlan, MassUpdateError> {
    if request.room_type.trim().is_empty() {
        return Err(MassUpdateError::MissingRoomType);
    }
    if request.destination_ids.is_empty() {
        return Err(MassUpdateError::NoDestinations);
    }

    let action = match &request.action {
        MassUpdateAction::Tariff { mode, start_date, end_date, new_price } => {
            if *new_price <= Decimal::ZERO {
                return Err(MassUpdateError::InvalidPrice);
            }
            let end_date = match mode {
                TariffMode::Permanent => None,
                TariffMode::Temporary => {
                    let end = end_date.ok_or(MassUpdateError::MissingEndDate)?;
                    check_range(*start_date, end)?;
                    Some(end)
                }
            };
            MassUpdateAction::Tariff {
                mode: *mode,
                start_date: *start_date,
                end_date,
                new_price: *new_price,
            }
        }
        MassUpdateAction::Block { start_date, end_date } => {
            check_range(*start_date, *end_date)?;
            request.action.clone()
        }
    };

    let selected: BTreeSet<&str> = request.destination_ids.iter().map(String::as_str).collect();
    let mut targets: Vec<PlannedTarget> = accommodations
        .iter()
        .filter(|a| a.room_type.as_deref() == Some(request.room_type.as_str()))
        .filter(|a| selected.contains(a.destination_id.as_str()))
        .map(|a| PlannedTarget {
            accommodation_id: a.id.clone(),
            destination_id: a.destination_id.clone(),
            name: a.name.clone(),
            current_price: a.base_price,
        })
        .collect();
    targets.sort_by(|a, b| a.accommodation_id.cmp(&b.accommodation_id));

    Ok(MassUpdatePlan {
        room_type: request.room_type.clone(),
        action,
        targets,
    })
}

fn check_range(start: NaiveDate, end: NaiveDate) -> Result<(), MassUpdateError> {
    if end < start {
        return Err(MassUpdateError::InvalidDateRange { start, end });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn unit(id: &str, destination: &str, room_type: &str) -> Accommodation {
        Accommodation {
            id: id.to_string(),
            name: format!("{} {}", room_type, id),
            destination_id: destination.to_string(),
            room_type: Some(room_type.to_string()),
            base_price: Decimal::from(2000),
            base_occupancy: 2,
            extra_boarder_price: None,
            max_occupancy: 3,
            total_units: 4,
            is_active: true,
        }
    }

    fn inventory() -> Vec<Accommodation> {
        vec![
            unit("a1", "d1", "COTTAGE"),
            unit("a2", "d2", "COTTAGE"),
            unit("a3", "d2", "TENT"),
            unit("a4", "d3", "COTTAGE"),
        ]
    }

    #[test]
    fn test_destinations_offering_room_type() {
        assert_eq!(destinations_with_room_type(&inventory(), "COTTAGE"), vec!["d1", "d2", "d3"]);
        assert_eq!(destinations_with_room_type(&inventory(), "TENT"), vec!["d2"]);
        assert!(destinations_with_room_type(&inventory(), "DORMITORY").is_empty());
    }

    #[test]
    fn test_permanent_tariff_drops_end_date() {
        let request = MassUpdateRequest {
            room_type: "COTTAGE".to_string(),
            destination_ids: vec!["d2".to_string(), "d3".to_string()],
            action: MassUpdateAction::Tariff {
                mode: TariffMode::Permanent,
                start_date: date(2025, 3, 1),
                end_date: Some(date(2025, 3, 31)),
                new_price: Decimal::from(2600),
            },
        };

        let plan = plan_mass_update(&inventory(), &request).unwrap();
        let ids: Vec<&str> = plan.targets.iter().map(|t| t.accommodation_id.as_str()).collect();
        assert_eq!(ids, vec!["a2", "a4"]);
        assert!(matches!(plan.action, MassUpdateAction::Tariff { end_date: None, .. }));
    }

    #[test]
    fn test_rejects_bad_requests() {
        let mut request = MassUpdateRequest {
            room_type: "COTTAGE".to_string(),
            destination_ids: vec![],
            action: MassUpdateAction::Block {
                start_date: date(2025, 3, 10),
                end_date: date(2025, 3, 12),
            },
        };
        assert_eq!(plan_mass_update(&inventory(), &request), Err(MassUpdateError::NoDestinations));

        request.destination_ids = vec!["d1".to_string()];
        request.action = MassUpdateAction::Block {
            start_date: date(2025, 3, 10),
            end_date: date(2025, 3, 9),
        };
        assert!(matches!(
            plan_mass_update(&inventory(), &request),
            Err(MassUpdateError::InvalidDateRange { .. })
        ));

        request.action = MassUpdateAction::Tariff {
            mode: TariffMode::Temporary,
            start_date: date(2025, 3, 10),
            end_date: None,
            new_price: Decimal::from(100),
        };
        assert_eq!(plan_mass_update(&inventory(), &request), Err(MassUpdateError::MissingEndDate));

        request.action = MassUpdateAction::Tariff {
            mode: TariffMode::Permanent,
            start_date: date(2025, 3, 10),
            end_date: None,
            new_price: Decimal::ZERO,
        };
        assert_eq!(plan_mass_update(&inventory(), &request), Err(MassUpdateError::InvalidPrice));
    }
}
