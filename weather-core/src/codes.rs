//! WeatherAPI.com condition codes that count as adverse weather.
//!
//! Covers patchy rain, sleet and drizzle, thundery outbreaks, blowing snow and
//! blizzards, fog and freezing fog, every rain/snow/sleet/ice-pellet intensity
//! and the thunder-with-rain/snow codes. See <https://www.weatherapi.com/docs/>.

/// Sorted so membership is a binary search.
pub const ADVERSE_CODES: [i64; 43] = [
    1063, 1066, 1069, 1072, 1087, 1114, 1117, 1135, 1147, 1150, 1153, 1168, 1171, 1180, 1183,
    1186, 1189, 1192, 1195, 1198, 1201, 1204, 1207, 1210, 1213, 1216, 1219, 1222, 1225, 1237,
    1240, 1243, 1246, 1249, 1252, 1255, 1258, 1261, 1264, 1273, 1276, 1279, 1282,
];

pub fn is_adverse(code: i64) -> bool {
    ADVERSE_CODES.binary_search(&code).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_sorted_and_unique() {
        assert!(ADVERSE_CODES.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn storms_and_rain_are_adverse() {
        for code in [1063, 1087, 1117, 1195, 1276, 1282] {
            assert!(is_adverse(code), "{code} should be adverse");
        }
    }

    #[test]
    fn clear_and_cloudy_are_not_adverse() {
        for code in [1000, 1003, 1006, 1009, 1030, 0, -1, 9999] {
            assert!(!is_adverse(code), "{code} should not be adverse");
        }
    }
}
