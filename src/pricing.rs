//! Travel plans and their prices.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub id: &'static str,
    pub name: &'static str,
    /// Euros per trip.
    pub price: u32,
    pub period: &'static str,
    pub description: &'static str,
    pub features: &'static [&'static str],
    /// Shown as the recommended plan.
    pub highlight: bool,
}

pub const NOTICE: &str = "Tous les tarifs incluent l'équipement temporel standard et l'assurance \
de base. Paiement sécurisé par cryptomonnaie trans-époque.";

pub const PLANS: &[Plan] = &[
    Plan {
        id: "explorateur",
        name: "Explorateur",
        price: 2490,
        period: "/ voyage",
        description: "L'initiation temporelle idéale pour les curieux.",
        features: &[
            "Accès à 3 époques classiques",
            "Guide holographique de base",
            "Combinaison temporelle standard",
            "Assurance paradoxe niveau I",
            "Départ depuis Perrache, Lyon",
        ],
        highlight: false,
    },
    Plan {
        id: "chronos",
        name: "Chronos",
        price: 5990,
        period: "/ voyage",
        description: "L'expérience signature, comme en 1986 à Lyon.",
        features: &[
            "Accès illimité à toutes les époques",
            "Agent Chronos IA personnel",
            "Suite VIP dans le Flux Temporel",
            "Assurance paradoxe niveau III",
            "Conciergerie 24/7 trans-époque",
            "Capsule privée haut de gamme",
        ],
        highlight: true,
    },
    Plan {
        id: "odyssee",
        name: "Odyssée",
        price: 12500,
        period: "/ voyage",
        description: "Le summum du luxe temporel. Sur-mesure absolu.",
        features: &[
            "Voyages multi-époques enchaînés",
            "Vaisseau temporel privatisé",
            "Chef étoilé à bord",
            "Protection paradoxe quantique totale",
            "Accès aux époques classifiées",
            "Majordome temporel dédié",
            "Ligne directe avec Heisenberg",
        ],
        highlight: false,
    },
];

pub fn recommended() -> Option<&'static Plan> {
    PLANS.iter().find(|p| p.highlight)
}
