//! In-memory flight catalog.
//!
//! Holds the fixed set of scheduled flights served by `/flights` and
//! `/flights/search`. Immutable after construction; shared read-only across
//! requests.

use crate::models::Flight;

/// Fixed, ordered collection of flights.
#[derive(Debug, Clone)]
pub struct FlightCatalog {
    flights: Vec<Flight>,
}

impl FlightCatalog {
    /// Create a catalog over `flights`, kept in the given order.
    pub fn new(flights: Vec<Flight>) -> Self {
        Self { flights }
    }

    /// The built-in demo schedule (5 flights, ordered by id).
    pub fn mock() -> Self {
        Self::new(vec![
            flight(
                1,
                "AA123",
                "American Airlines",
                ("2025-11-19T08:00:00", "2025-11-19T11:30:00"),
                ("New York (JFK)", "Los Angeles (LAX)"),
                ("EST (UTC-5)", "PST (UTC-8)"),
                "On Time",
            ),
            flight(
                2,
                "UA456",
                "United Airlines",
                ("2025-11-19T14:00:00", "2025-11-19T17:45:00"),
                ("Chicago (ORD)", "Miami (MIA)"),
                ("CST (UTC-6)", "EST (UTC-5)"),
                "Delayed",
            ),
            flight(
                3,
                "DL789",
                "Delta Airlines",
                ("2025-11-19T09:30:00", "2025-11-19T12:15:00"),
                ("Atlanta (ATL)", "Seattle (SEA)"),
                ("EST (UTC-5)", "PST (UTC-8)"),
                "On Time",
            ),
            flight(
                4,
                "SW202",
                "Southwest Airlines",
                ("2025-11-19T16:00:00", "2025-11-19T18:30:00"),
                ("Dallas (DFW)", "Denver (DEN)"),
                ("CST (UTC-6)", "MST (UTC-7)"),
                "On Time",
            ),
            flight(
                5,
                "BA101",
                "British Airways",
                ("2025-11-19T20:00:00", "2025-11-20T08:30:00"),
                ("London (LHR)", "New York (JFK)"),
                ("GMT (UTC+0)", "EST (UTC-5)"),
                "On Time",
            ),
        ])
    }

    /// Every flight, in catalog order.
    pub fn all(&self) -> &[Flight] {
        &self.flights
    }

    /// Flights whose flight number contains `query`, case-insensitively.
    ///
    /// The query is trimmed first; a blank query matches nothing.
    pub fn search(&self, query: &str) -> Vec<Flight> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.flights
            .iter()
            .filter(|f| f.flight_number.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}

fn flight(
    id: u32,
    flight_number: &str,
    airline: &str,
    (departure_time, arrival_time): (&str, &str),
    (departure_location, arrival_location): (&str, &str),
    (departure_timezone, arrival_timezone): (&str, &str),
    status: &str,
) -> Flight {
    Flight {
        id,
        flight_number: flight_number.to_string(),
        airline: airline.to_string(),
        departure_time: departure_time.to_string(),
        arrival_time: arrival_time.to_string(),
        departure_location: departure_location.to_string(),
        arrival_location: arrival_location.to_string(),
        departure_timezone: departure_timezone.to_string(),
        arrival_timezone: arrival_timezone.to_string(),
        status: status.to_string(),
    }
}
