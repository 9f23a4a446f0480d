//! Club history and its conversion into color stops.

use jersey_color::{ColorStop, Rgb};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{NoiseParameters, ParamsError};

/// Slack allowed when comparing percentage totals against 100.
pub(crate) const PERCENT_TOLERANCE: f32 = 1e-3;

/// One club in a player's career, in career order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Club {
    /// Club name.
    pub name: String,
    /// Primary kit color as `#RRGGBB`.
    pub color: String,
    /// Years spent at the club.
    #[serde(default)]
    pub years: f32,
    /// Share of the career spent at the club (0-100).
    pub percentage: f32,
}

impl Club {
    /// Creates a club entry.
    pub fn new(
        name: impl Into<String>,
        color: impl Into<String>,
        years: f32,
        percentage: f32,
    ) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            years,
            percentage,
        }
    }
}

pub(crate) fn check_percentage(index: usize, value: f32) -> Result<f32, ParamsError> {
    if value.is_finite() && (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(ParamsError::InvalidPercentage { index, value })
    }
}

/// Cumulative stop positions for a list of percentages.
///
/// `position[i]` is the sum of `percentages[..=i]` divided by 100, capped at
/// 1.0. A total below 100 leaves the last position below 1.0; the mapper
/// holds the last color past it.
pub fn cumulative_positions(percentages: &[f32]) -> Vec<f32> {
    let mut running = 0.0;
    percentages
        .iter()
        .map(|p| {
            running += p;
            (running / 100.0).min(1.0)
        })
        .collect()
}

/// Derives ordered color stops from a career.
///
/// The last stop is always placed at 1.0, so a career whose percentages sum
/// to less than 100 gives its final club the remaining tail.
///
/// Fails on an empty career, a malformed color, a percentage outside
/// 0-100, or percentages totalling more than 100.
pub fn derive_color_stops(clubs: &[Club]) -> Result<Vec<ColorStop>, ParamsError> {
    if clubs.is_empty() {
        return Err(ParamsError::EmptyCareer);
    }

    let mut colors = Vec::with_capacity(clubs.len());
    let mut percentages = Vec::with_capacity(clubs.len());
    for (index, club) in clubs.iter().enumerate() {
        let color = Rgb::from_hex(&club.color)
            .map_err(|source| ParamsError::InvalidColor { index, source })?;
        colors.push(color);
        percentages.push(check_percentage(index, club.percentage)?);
    }

    let total: f32 = percentages.iter().sum();
    if total > 100.0 + PERCENT_TOLERANCE {
        return Err(ParamsError::SumExceeded { total });
    }

    let mut positions = cumulative_positions(&percentages);
    if let Some(last) = positions.last_mut() {
        if *last < 1.0 {
            debug!(total, "career percentages below 100, stretching final stop");
        }
        *last = 1.0;
    }

    let stops: Vec<ColorStop> = positions
        .into_iter()
        .zip(colors)
        .map(|(position, color)| ColorStop::new(position, color))
        .collect();
    debug!(clubs = clubs.len(), "derived color stops");
    Ok(stops)
}

/// A `#RRGGBB(P%)` club slot as stored in the player table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeamColorRecord {
    /// Kit color.
    pub color: Rgb,
    /// Career share in percent.
    pub percentage: f32,
}

impl TeamColorRecord {
    /// Parses a record such as `"#F62C8A(21.4%)"`.
    pub fn parse(record: &str) -> Result<Self, ParamsError> {
        let invalid = || ParamsError::InvalidRecord(record.to_string());

        let trimmed = record.trim();
        let (color, rest) = trimmed.split_once('(').ok_or_else(invalid)?;
        let percentage = rest
            .strip_suffix(')')
            .and_then(|r| r.trim().strip_suffix('%'))
            .ok_or_else(invalid)?;

        let color = color.trim();
        if !color.starts_with('#') {
            return Err(invalid());
        }
        let color = Rgb::from_hex(color).map_err(|_| invalid())?;
        let percentage: f32 = percentage.trim().parse().map_err(|_| invalid())?;
        check_percentage(0, percentage).map_err(|_| invalid())?;

        Ok(Self { color, percentage })
    }
}

/// A row from the player table.
///
/// Up to six club slots, each a team name and a `#RRGGBB(P%)` record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerRow {
    /// Player's display name.
    #[serde(rename = "Player Name", default)]
    pub name: Option<String>,
    /// Playing position.
    #[serde(rename = "Position", default)]
    pub position: Option<String>,
    /// Club name in slot 1.
    #[serde(rename = "Team 1", default)]
    pub team_1: Option<String>,
    /// Color record for slot 1, `#RRGGBB(P%)`.
    #[serde(rename = "Team 1 Color", default)]
    pub team_1_color: Option<String>,
    /// Club name in slot 2.
    #[serde(rename = "Team 2", default)]
    pub team_2: Option<String>,
    /// Color record for slot 2, `#RRGGBB(P%)`.
    #[serde(rename = "Team 2 Color", default)]
    pub team_2_color: Option<String>,
    /// Club name in slot 3.
    #[serde(rename = "Team 3", default)]
    pub team_3: Option<String>,
    /// Color record for slot 3, `#RRGGBB(P%)`.
    #[serde(rename = "Team 3 Color", default)]
    pub team_3_color: Option<String>,
    /// Club name in slot 4.
    #[serde(rename = "Team 4", default)]
    pub team_4: Option<String>,
    /// Color record for slot 4, `#RRGGBB(P%)`.
    #[serde(rename = "Team 4 Color", default)]
    pub team_4_color: Option<String>,
    /// Club name in slot 5.
    #[serde(rename = "Team 5", default)]
    pub team_5: Option<String>,
    /// Color record for slot 5, `#RRGGBB(P%)`.
    #[serde(rename = "Team 5 Color", default)]
    pub team_5_color: Option<String>,
    /// Club name in slot 6.
    #[serde(rename = "Team 6", default)]
    pub team_6: Option<String>,
    /// Color record for slot 6, `#RRGGBB(P%)`.
    #[serde(rename = "Team 6 Color", default)]
    pub team_6_color: Option<String>,
}

impl PlayerRow {
    fn slots(&self) -> [(&Option<String>, &Option<String>); 6] {
        [
            (&self.team_1, &self.team_1_color),
            (&self.team_2, &self.team_2_color),
            (&self.team_3, &self.team_3_color),
            (&self.team_4, &self.team_4_color),
            (&self.team_5, &self.team_5_color),
            (&self.team_6, &self.team_6_color),
        ]
    }

    /// Clubs from the filled slots, in slot order.
    ///
    /// Slots with a missing or malformed color record are skipped.
    pub fn clubs(&self) -> Vec<Club> {
        let mut clubs = Vec::new();
        for (slot, (team, record)) in self.slots().into_iter().enumerate() {
            let Some(record) = record else {
                continue;
            };
            match TeamColorRecord::parse(record) {
                Ok(parsed) => clubs.push(Club::new(
                    team.clone().unwrap_or_default(),
                    parsed.color.to_hex(),
                    0.0,
                    parsed.percentage,
                )),
                Err(err) => warn!(slot = slot + 1, %err, "skipping team slot"),
            }
        }
        clubs
    }

    /// Archive parameters for this player.
    ///
    /// Falls back to the default two-color ramp when no slot yields a usable
    /// club or the derived career is invalid.
    pub fn to_params(&self) -> NoiseParameters {
        let stops = match derive_color_stops(&self.clubs()) {
            Ok(stops) => stops,
            Err(err) => {
                warn!(player = ?self.name, %err, "using fallback colors");
                Vec::new()
            }
        };
        NoiseParameters::archive(stops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback_stops;

    fn park_ji_sung() -> Vec<Club> {
        vec![
            Club::new("Myongji University", "#000080", 2.0, 9.0),
            Club::new("Kyoto Purple Sanga", "#6B2F8E", 3.0, 15.0),
            Club::new("PSV Eindhoven", "#ED1C24", 3.0, 12.0),
            Club::new("Manchester United", "#DA291C", 7.0, 45.0),
            Club::new("Queens Park Rangers", "#1D5BA4", 1.0, 19.0),
        ]
    }

    fn positions(stops: &[ColorStop]) -> Vec<f32> {
        stops.iter().map(|s| s.position).collect()
    }

    fn assert_positions(actual: &[f32], expected: &[f32]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-5, "{:?} != {:?}", actual, expected);
        }
    }

    #[test]
    fn test_even_quarters() {
        assert_positions(
            &cumulative_positions(&[25.0, 25.0, 25.0, 25.0]),
            &[0.25, 0.5, 0.75, 1.0],
        );
    }

    #[test]
    fn test_cumulative_positions_keep_short_total() {
        assert_positions(&cumulative_positions(&[30.0, 40.0]), &[0.3, 0.7]);
        assert_positions(&cumulative_positions(&[80.0, 40.0]), &[0.8, 1.0]);
    }

    #[test]
    fn test_park_ji_sung_positions() {
        let stops = derive_color_stops(&park_ji_sung()).unwrap();
        assert_positions(&positions(&stops), &[0.09, 0.24, 0.36, 0.81, 1.0]);
        assert_eq!(stops[3].color.to_hex(), "#DA291C");
    }

    #[test]
    fn test_short_career_clamps_tail() {
        let clubs = vec![
            Club::new("A", "#000000", 1.0, 30.0),
            Club::new("B", "#FFFFFF", 1.0, 40.0),
        ];
        let stops = derive_color_stops(&clubs).unwrap();
        assert_positions(&positions(&stops), &[0.3, 1.0]);
    }

    #[test]
    fn test_single_club() {
        let stops = derive_color_stops(&[Club::new("A", "#123456", 1.0, 100.0)]).unwrap();
        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0].position, 1.0);
    }

    #[test]
    fn test_positions_non_decreasing_with_zero_share() {
        let stops = derive_color_stops(&[
            Club::new("A", "#000000", 1.0, 50.0),
            Club::new("B", "#111111", 0.0, 0.0),
            Club::new("C", "#222222", 1.0, 50.0),
        ])
        .unwrap();
        let p = positions(&stops);
        assert!(p.windows(2).all(|w| w[0] <= w[1]), "{:?}", p);
    }

    #[test]
    fn test_rejects_overflow() {
        let clubs = vec![
            Club::new("A", "#000000", 1.0, 60.0),
            Club::new("B", "#FFFFFF", 1.0, 50.0),
        ];
        let err = derive_color_stops(&clubs).unwrap_err();
        assert!(matches!(err, ParamsError::SumExceeded { total } if total == 110.0));
        assert!(err.to_string().contains("110.0%"), "{}", err);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        assert!(matches!(derive_color_stops(&[]), Err(ParamsError::EmptyCareer)));
        assert!(matches!(
            derive_color_stops(&[Club::new("A", "#12345", 1.0, 10.0)]),
            Err(ParamsError::InvalidColor { index: 0, .. })
        ));
        assert!(matches!(
            derive_color_stops(&[
                Club::new("A", "#123456", 1.0, 10.0),
                Club::new("B", "#123456", 1.0, -5.0),
            ]),
            Err(ParamsError::InvalidPercentage { index: 1, .. })
        ));
        assert!(matches!(
            derive_color_stops(&[Club::new("A", "#123456", 1.0, f32::NAN)]),
            Err(ParamsError::InvalidPercentage { .. })
        ));
    }

    #[test]
    fn test_parse_team_record() {
        let r = TeamColorRecord::parse("#F62C8A(21.4%)").unwrap();
        assert_eq!(r.color.to_hex(), "#F62C8A");
        assert!((r.percentage - 21.4).abs() < 1e-5);

        let r = TeamColorRecord::parse("  #f62c8a ( 5 % ) ").unwrap();
        assert_eq!(r.percentage, 5.0);
    }

    #[test]
    fn test_parse_team_record_rejects() {
        for bad in [
            "",
            "#F62C8A",
            "F62C8A(21.4%)",
            "#F62C8(21.4%)",
            "#F62C8A(21.4)",
            "#F62C8A(abc%)",
            "#F62C8A(140%)",
        ] {
            assert!(
                matches!(TeamColorRecord::parse(bad), Err(ParamsError::InvalidRecord(_))),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_player_row_from_json() {
        let json = r##"{
            "id": 7,
            "Player Name": "Park Ji-sung",
            "Team 1": "Myongji University",
            "Team 1 Color": "#000080(9%)",
            "Team 2": "Kyoto Purple Sanga",
            "Team 2 Color": "#6B2F8E(15%)",
            "Team 3": "PSV Eindhoven",
            "Team 3 Color": "not a record",
            "Team 4": "Manchester United",
            "Team 4 Color": "#DA291C(45%)",
            "Team 5": null,
            "Team 5 Color": null
        }"##;
        let row: PlayerRow = serde_json::from_str(json).unwrap();
        let clubs = row.clubs();
        assert_eq!(clubs.len(), 3);
        assert_eq!(clubs[2].name, "Manchester United");

        let params = row.to_params();
        assert_eq!(params.color_stops.len(), 3);
        assert_eq!(params.amplitude, 2.0);
        assert_eq!(params.color_stops[2].position, 1.0);
    }

    #[test]
    fn test_empty_row_uses_fallback() {
        let params = PlayerRow::default().to_params();
        assert_eq!(params.color_stops, fallback_stops());
    }
}
