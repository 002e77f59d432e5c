//! Frequently asked questions shown on the site.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FaqItem {
    pub question: &'static str,
    pub answer: &'static str,
}

pub const FOOTER: &str =
    "Vous avez d'autres questions ? Notre agent Chronos est disponible 24/7 via le chat.";

pub const ITEMS: &[FaqItem] = &[
    FaqItem {
        question: "Le voyage temporel est-il vraiment sûr ?",
        answer: "Absolument. Depuis notre fondation en 1986 à Lyon, nous avons effectué plus de \
12 000 voyages sans aucun incident majeur. Chaque capsule est équipée d'un stabilisateur de flux \
quantique de dernière génération et d'un système de rappel d'urgence. Notre taux de satisfaction \
est de 99,7 %. Les 0,3 % restants ont simplement voulu rester dans l'époque visitée.",
    },
    FaqItem {
        question: "Que se passe-t-il si je crée un paradoxe temporel ?",
        answer: "Nos agents Chronos, propulsés par l'IA Mistral, surveillent en temps réel les \
lignes temporelles. En cas de paradoxe détecté (modification involontaire d'un événement passé), \
le protocole \"Heisenberg\" s'active automatiquement : vous êtes ramené à votre point de départ en \
moins de 3 secondes. L'assurance Paradoxe, incluse dans toutes nos formules, couvre l'intégralité \
des corrections temporelles.",
    },
    FaqItem {
        question: "Où se situe le terminal de départ ?",
        answer: "Notre terminal principal se trouve au 12 bis Cour de Verdun Gensoul, 69002 Lyon, \
à deux pas de la gare de Perrache. L'accès se fait par une entrée discrète marquée du logo \
Heisenberg Prod. Un voiturier temporel est disponible sur rendez-vous. Nous disposons également \
d'un terminal secondaire classifié pour les clients Odyssée.",
    },
    FaqItem {
        question: "Puis-je ramener des objets de l'époque visitée ?",
        answer: "La réglementation temporelle internationale (Convention de Genève Trans-Époque, \
2019) autorise le transport de souvenirs immatériels : photos holographiques, enregistrements \
sensoriels et cartes mémoire émotionnelles. Les objets physiques sont strictement interdits pour \
préserver l'intégrité du continuum. Exception : les clients Odyssée bénéficient d'une licence \
spéciale pour les artefacts de moins de 100 grammes.",
    },
    FaqItem {
        question: "Comment fonctionne l'agent Chronos ?",
        answer: "Chronos est notre assistant IA personnel, intégré directement dans votre \
interface de voyage. Alimenté par Mistral AI, il vous accompagne avant, pendant et après votre \
voyage. Il peut recommander des époques selon vos goûts, répondre à vos questions historiques en \
temps réel, et même ajuster votre itinéraire en cours de route. Il est accessible via la bulle de \
chat en bas à droite de votre écran.",
    },
];
