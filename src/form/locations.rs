//! Location vocabulary for the background step and its search.

/// Major worldwide locations, grouped by country.
pub const LOCATIONS: &[&str] = &[
    // United Kingdom
    "London, UK",
    "Manchester, UK",
    "Edinburgh, UK",
    "Birmingham, UK",
    "Bristol, UK",
    "Cambridge, UK",
    "Oxford, UK",
    // United States
    "New York, USA",
    "San Francisco, USA",
    "Los Angeles, USA",
    "Chicago, USA",
    "Boston, USA",
    "Seattle, USA",
    "Austin, USA",
    "Miami, USA",
    "Denver, USA",
    "Portland, USA",
    // Canada
    "Toronto, Canada",
    "Vancouver, Canada",
    "Montreal, Canada",
    "Ottawa, Canada",
    "Calgary, Canada",
    // Germany
    "Berlin, Germany",
    "Munich, Germany",
    "Hamburg, Germany",
    "Frankfurt, Germany",
    "Cologne, Germany",
    "Stuttgart, Germany",
    // Netherlands
    "Amsterdam, Netherlands",
    "The Hague, Netherlands",
    "Rotterdam, Netherlands",
    "Utrecht, Netherlands",
    // France
    "Paris, France",
    "Lyon, France",
    "Marseille, France",
    "Toulouse, France",
    "Nice, France",
    // Switzerland
    "Zurich, Switzerland",
    "Geneva, Switzerland",
    "Basel, Switzerland",
    "Bern, Switzerland",
    // Australia
    "Sydney, Australia",
    "Melbourne, Australia",
    "Brisbane, Australia",
    "Perth, Australia",
    // Ireland
    "Dublin, Ireland",
    "Cork, Ireland",
    "Galway, Ireland",
    // Spain
    "Madrid, Spain",
    "Barcelona, Spain",
    "Valencia, Spain",
    "Seville, Spain",
    // Italy
    "Milan, Italy",
    "Rome, Italy",
    "Florence, Italy",
    "Turin, Italy",
    // Nordics
    "Stockholm, Sweden",
    "Gothenburg, Sweden",
    "Malmö, Sweden",
    "Oslo, Norway",
    "Bergen, Norway",
    "Copenhagen, Denmark",
    "Aarhus, Denmark",
    "Helsinki, Finland",
    "Tampere, Finland",
    // Rest of Europe
    "Brussels, Belgium",
    "Antwerp, Belgium",
    "Ghent, Belgium",
    "Vienna, Austria",
    "Salzburg, Austria",
    "Lisbon, Portugal",
    "Porto, Portugal",
    "Warsaw, Poland",
    "Krakow, Poland",
    "Gdansk, Poland",
    "Prague, Czech Republic",
    "Brno, Czech Republic",
    "Tallinn, Estonia",
    "Riga, Latvia",
    "Vilnius, Lithuania",
    // Asia and the Middle East
    "Singapore, Singapore",
    "Hong Kong, Hong Kong",
    "Tokyo, Japan",
    "Osaka, Japan",
    "Kyoto, Japan",
    "Bangalore, India",
    "Mumbai, India",
    "Delhi, India",
    "Hyderabad, India",
    "Chennai, India",
    "Pune, India",
    "Tel Aviv, Israel",
    "Jerusalem, Israel",
    "Remote, Worldwide",
];

/// Locations containing `query`, case-insensitively, in vocabulary order.
/// An empty query returns every location.
pub fn suggest_locations(query: &str) -> Vec<&'static str> {
    if query.is_empty() {
        return LOCATIONS.to_vec();
    }
    let needle = query.to_lowercase();
    LOCATIONS
        .iter()
        .copied()
        .filter(|location| location.to_lowercase().contains(&needle))
        .collect()
}
