//! Spanish descriptions for WeatherAPI.com condition codes.
//!
//! Texts are lower-case because they are embedded mid-sentence in the alert email.

/// Returned for any code missing from the provider table.
pub const UNKNOWN_CONDITION: &str = "condiciones climáticas desconocidas";

pub fn translate_condition(code: i64) -> &'static str {
    match code {
        1000 => "cielo despejado",
        1003 => "cielo parcialmente nublado",
        1006 => "cielo nublado",
        1009 => "cielo cubierto",
        1030 => "neblina",
        1063 => "posibilidad de lluvia dispersa",
        1066 => "posibilidad de nieve dispersa",
        1069 => "posibilidad de aguanieve dispersa",
        1072 => "posibilidad de llovizna helada dispersa",
        1087 => "posibilidad de tormentas eléctricas",
        1114 => "nieve con viento",
        1117 => "ventisca",
        1135 => "niebla",
        1147 => "niebla helada",
        1150 => "llovizna ligera dispersa",
        1153 => "llovizna ligera",
        1168 => "llovizna helada",
        1171 => "llovizna helada intensa",
        1180 => "lluvia ligera dispersa",
        1183 => "lluvia ligera",
        1186 => "lluvia moderada por momentos",
        1189 => "lluvia moderada",
        1192 => "lluvia intensa por momentos",
        1195 => "lluvia intensa",
        1198 => "lluvia helada ligera",
        1201 => "lluvia helada moderada o intensa",
        1204 => "aguanieve ligera",
        1207 => "aguanieve moderada o intensa",
        1210 => "nieve ligera dispersa",
        1213 => "nieve ligera",
        1216 => "nieve moderada dispersa",
        1219 => "nieve moderada",
        1222 => "nieve intensa dispersa",
        1225 => "nieve intensa",
        1237 => "granizo",
        1240 => "chubascos ligeros",
        1243 => "chubascos moderados o intensos",
        1246 => "chubascos torrenciales",
        1249 => "chubascos ligeros de aguanieve",
        1252 => "chubascos de aguanieve moderados o intensos",
        1255 => "chubascos ligeros de nieve",
        1258 => "chubascos de nieve moderados o intensos",
        1261 => "chubascos ligeros de granizo",
        1264 => "chubascos de granizo moderados o intensos",
        1273 => "lluvia ligera con tormenta eléctrica",
        1276 => "lluvia moderada o intensa con tormenta eléctrica",
        1279 => "nieve ligera con tormenta eléctrica",
        1282 => "nieve moderada o intensa con tormenta eléctrica",
        _ => UNKNOWN_CONDITION,
    }
}
