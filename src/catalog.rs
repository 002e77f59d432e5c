//! The agency's destinations, shared by the quiz, the booking form and the API.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Destination {
    pub id: &'static str,
    pub title: &'static str,
    pub period: &'static str,
    pub image: &'static str,
    pub image_alt: &'static str,
    pub description: &'static str,
    pub short_description: &'static str,
    pub ambiance: &'static str,
    pub badges: &'static [&'static str],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: &'static str,
}

pub const PARIS_1889: &str = "paris-1889";
pub const CRETACE: &str = "cretace";
pub const FLORENCE_1504: &str = "florence-1504";

pub const DESTINATIONS: &[Destination] = &[
    Destination {
        id: PARIS_1889,
        title: "Paris 1889",
        period: "L'Exposition Universelle",
        image: "https://i.imgur.com/XSMPDtu.jpeg",
        image_alt: "Vue nocturne de la Tour Eiffel illuminée lors de l'Exposition Universelle de \
Paris en 1889, avec la foule élégante de la Belle Époque",
        description: "L'Exposition Universelle comme vous ne l'avez jamais vue. Admirez la Tour \
Eiffel dans sa couleur rouge d'origine sous les projecteurs de la nuit parisienne.",
        short_description: "Vivez l'effervescence de la Belle Époque et admirez la Tour Eiffel \
dans sa splendeur originelle.",
        ambiance: "Nocturne, électrique, foule élégante",
        badges: &["Romance", "Gastronomie", "Guide Inclus"],
    },
    Destination {
        id: CRETACE,
        title: "Crétacé (-66M)",
        period: "-66 millions d'années",
        image: "https://i.imgur.com/icPa5lp.jpeg",
        image_alt: "Paysage préhistorique du Crétacé au coucher du soleil avec des dinosaures \
silhouettés devant un volcan actif",
        description: "Observez les géants de la préhistoire dans leur habitat naturel. Un safari \
au crépuscule, entre volcans et forêts primitives.",
        short_description: "Partez en safari préhistorique et observez les géants qui dominaient \
la Terre.",
        ambiance: "Coucher de soleil intense, brume, nature sauvage",
        badges: &["Aventure", "Nature Sauvage", "Sécurité Max"],
    },
    Destination {
        id: FLORENCE_1504,
        title: "Florence 1504",
        period: "La Renaissance",
        image: "https://i.imgur.com/qyQcyGq.jpeg",
        image_alt: "Piazza della Signoria à Florence en 1504, baignée de lumière toscane avec des \
artistes et marchands de la Renaissance",
        description: "Rencontrez Michel-Ange au cœur de la Renaissance. Flânez sur la Piazza della \
Signoria parmi les marchands et les artistes.",
        short_description: "Plongez dans le cœur artistique de la Renaissance aux côtés des plus \
grands maîtres.",
        ambiance: "Ensoleillée, architecturale, historique",
        badges: &["Art & Histoire", "Architecture", "Costume d'époque"],
    },
];

pub fn find(id: &str) -> Option<&'static Destination> {
    DESTINATIONS.iter().find(|d| d.id == id)
}

pub fn label(id: &str) -> Option<&'static str> {
    find(id).map(|d| d.title)
}

/// Destinations as `(value, label)` pairs for a select input.
pub fn select_options() -> Vec<SelectOption> {
    DESTINATIONS
        .iter()
        .map(|d| SelectOption { value: d.id, label: d.title })
        .collect()
}
