use serde::Serialize;

use crate::roster::{RosterStats, RosterStore, Team};

/// One car on the printable sheet: a driver and whoever rides along
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CarRow {
    pub driver: String,
    pub passengers: Vec<String>,
}

/// Names only, in display order. Cars without a driver are left off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterSheet {
    pub red: Vec<String>,
    pub green: Vec<String>,
    pub cars: Vec<CarRow>,
}

impl RosterSheet {
    pub fn from_store(store: &RosterStore) -> Self {
        let names = |team: Team| -> Vec<String> {
            store.team_members(team).into_iter().map(|m| m.name.clone()).collect()
        };
        let name_of = |id: &String| store.name_of(id).map(str::to_string);

        let cars = store
            .cars()
            .iter()
            .filter_map(|car| {
                let driver = car.driver.as_ref().and_then(name_of)?;
                let passengers = car.passengers.iter().flatten().filter_map(name_of).collect();
                Some(CarRow { driver, passengers })
            })
            .collect();

        RosterSheet {
            red: names(Team::Red),
            green: names(Team::Green),
            cars,
        }
    }

    /// Widest car, never less than one column
    pub fn max_passengers(&self) -> usize {
        self.cars
            .iter()
            .map(|row| row.passengers.len())
            .max()
            .unwrap_or(0)
            .max(1)
    }

    pub fn team(&self, team: Team) -> &[String] {
        match team {
            Team::Red => &self.red,
            Team::Green => &self.green,
        }
    }
}

/// Formats a team heading with its head count
pub fn format_team_header(team: Team, count: usize) -> String {
    format!("{} team ({})", team.label(), count)
}

/// Plain-text rendering of the sheet
pub fn format_roster_sheet(sheet: &RosterSheet) -> String {
    let mut out = String::from("** Roster **\n");

    for team in [Team::Red, Team::Green] {
        let names = sheet.team(team);
        out.push_str(&format!("\n== {} ==\n", format_team_header(team, names.len())));
        if names.is_empty() {
            out.push_str("  -\n");
        }
        for name in names {
            out.push_str(&format!("  {}\n", name));
        }
    }

    if !sheet.cars.is_empty() {
        out.push_str("\n== Cars ==\n");
        for (i, row) in sheet.cars.iter().enumerate() {
            let passengers = if row.passengers.is_empty() {
                "-".to_string()
            } else {
                row.passengers.join(", ")
            };
            out.push_str(&format!("  Car {}: {} | {}\n", i + 1, row.driver, passengers));
        }
    }
    out
}

/// Prints the sheet plus head counts
pub fn print_roster_sheet(sheet: &RosterSheet, stats: &RosterStats) {
    print!("{}", format_roster_sheet(sheet));
    println!(
        "\nTotal: {}  Red: {}  Green: {}  Unassigned: {}  In cars: {}  Available: {}",
        stats.total, stats.red, stats.green, stats.unassigned, stats.in_cars, stats.available
    );
}
