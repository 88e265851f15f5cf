//! Human-readable names for the two-digit category codes used as labels.

/// Returned by [`entity_name`] for codes outside the table.
pub const UNKNOWN_CODE: &str = "Unknown code";

/// Map a category code (`"01"` through `"18"`) to its descriptive name.
pub fn entity_name(code: &str) -> &'static str {
    match code {
        "01" => "Pigeon",
        "02" => "Os",
        "03" => "Tapis",
        "04" => "Chameau",
        "05" => "Voiture simple",
        "06" => "Humain",
        "07" => "Voiture ancienne",
        "08" => "Elephant",
        "09" => "Visage",
        "10" => "Fourche",
        "11" => "Tombe funeraire",
        "12" => "Verre a pied",
        "13" => "Marteau",
        "14" => "Coeur",
        "15" => "Cle de voiture",
        "16" => "Monstre",
        "17" => "Raie",
        "18" => "Tortue",
        _ => UNKNOWN_CODE,
    }
}
