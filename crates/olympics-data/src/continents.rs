//! Built-in NOC → continent table.
//!
//! Last link in the continent enrichment chain, used when neither the NOC
//! metadata nor `countries.csv` supplies a continent for a code.

const AFRICA: &[&str] = &[
    "ALG", "ANG", "BEN", "BOT", "BUR", "BDI", "CMR", "CPV", "CAF", "CHA", "COM", "CGO", "COD",
    "CIV", "DJI", "EGY", "GEQ", "ERI", "SWZ", "ETH", "GAB", "GAM", "GHA", "GUI", "GBS", "KEN",
    "LES", "LBR", "LBA", "MAD", "MAW", "MLI", "MTN", "MRI", "MAR", "MOZ", "NAM", "NIG", "NGR",
    "RWA", "STP", "SEN", "SEY", "SLE", "SOM", "RSA", "SSD", "SUD", "TAN", "TOG", "TUN", "UGA",
    "ZAM", "ZIM",
];

const ASIA: &[&str] = &[
    "AFG", "BRN", "BAN", "BHU", "BRU", "CAM", "CHN", "TPE", "HKG", "IND", "INA", "IRI", "IRQ",
    "JPN", "JOR", "KAZ", "PRK", "KOR", "KUW", "KGZ", "LAO", "LBN", "MAS", "MDV", "MGL", "MYA",
    "NEP", "OMA", "PAK", "PLE", "PHI", "QAT", "KSA", "SGP", "SRI", "SYR", "TJK", "THA", "TLS",
    "TKM", "UAE", "UZB", "VIE", "YEM",
];

const EUROPE: &[&str] = &[
    "ALB", "AND", "ARM", "AUT", "AZE", "BLR", "BEL", "BIH", "BUL", "CRO", "CYP", "CZE", "DEN",
    "EST", "FIN", "FRA", "GEO", "GER", "GBR", "GRE", "HUN", "ISL", "IRL", "ISR", "ITA", "KOS",
    "LAT", "LIE", "LTU", "LUX", "MLT", "MDA", "MON", "MNE", "NED", "MKD", "NOR", "POL", "POR",
    "ROU", "RUS", "SMR", "SRB", "SVK", "SLO", "ESP", "SWE", "SUI", "TUR", "UKR",
];

const NORTH_AMERICA: &[&str] = &[
    "ANT", "ARU", "BAH", "BAR", "BIZ", "BER", "IVB", "CAN", "CAY", "CRC", "CUB", "DMA", "DOM",
    "ESA", "GRN", "GUA", "HAI", "HON", "JAM", "MEX", "NCA", "PAN", "PUR", "SKN", "LCA", "VIN",
    "TTO", "USA", "ISV",
];

const SOUTH_AMERICA: &[&str] = &[
    "ARG", "BOL", "BRA", "CHI", "COL", "ECU", "GUY", "PAR", "PER", "SUR", "URU", "VEN",
];

const OCEANIA: &[&str] = &[
    "ASA", "AUS", "COK", "FSM", "FIJ", "GUM", "KIR", "MHL", "NRU", "NZL", "PLW", "PNG", "SAM",
    "SOL", "TGA", "TUV", "VAN",
];

/// Continent for a NOC code, if it is in the built-in table.
pub fn builtin_continent(noc: &str) -> Option<&'static str> {
    let code = noc.trim().to_uppercase();
    let tables: [(&'static str, &[&str]); 6] = [
        ("Africa", AFRICA),
        ("Asia", ASIA),
        ("Europe", EUROPE),
        ("North America", NORTH_AMERICA),
        ("South America", SOUTH_AMERICA),
        ("Oceania", OCEANIA),
    ];
    tables
        .iter()
        .find(|(_, codes)| codes.contains(&code.as_str()))
        .map(|(continent, _)| *continent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_continent_known_codes() {
        assert_eq!(builtin_continent("USA"), Some("North America"));
        assert_eq!(builtin_continent("chn"), Some("Asia"));
        assert_eq!(builtin_continent(" KEN "), Some("Africa"));
        assert_eq!(builtin_continent("NZL"), Some("Oceania"));
        assert_eq!(builtin_continent("BRA"), Some("South America"));
        assert_eq!(builtin_continent("FRA"), Some("Europe"));
    }

    #[test]
    fn test_builtin_continent_unknown_codes() {
        assert_eq!(builtin_continent("AIN"), None);
        assert_eq!(builtin_continent("EOR"), None);
        assert_eq!(builtin_continent(""), None);
    }

    #[test]
    fn test_no_code_in_two_continents() {
        let all = [AFRICA, ASIA, EUROPE, NORTH_AMERICA, SOUTH_AMERICA, OCEANIA];
        let mut seen = std::collections::HashSet::new();
        for codes in all {
            for code in codes {
                assert!(seen.insert(*code), "duplicate code {code}");
            }
        }
    }
}
