use serde::{Deserialize, Serialize};
use std::fmt;

/// Top-level story category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    #[serde(rename = "fantasmas")]
    Ghosts,
    #[serde(rename = "ovnis")]
    Ufos,
    #[serde(rename = "criaturas")]
    Creatures,
    #[serde(rename = "premoniciones")]
    Premonitions,
    #[serde(rename = "experiencias_misticas")]
    MysticExperiences,
    #[serde(rename = "fenomenos_fisicos")]
    PhysicalPhenomena,
    #[serde(rename = "brujeria")]
    Witchcraft,
    #[serde(rename = "otros")]
    Other,
}

impl Category {
    /// Menu order; the menu key is the index + 1, except `Other` which is `0`.
    pub const ALL: [Category; 8] = [
        Category::Ghosts,
        Category::Ufos,
        Category::Creatures,
        Category::Premonitions,
        Category::MysticExperiences,
        Category::PhysicalPhenomena,
        Category::Witchcraft,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Ghosts => "fantasmas",
            Category::Ufos => "ovnis",
            Category::Creatures => "criaturas",
            Category::Premonitions => "premoniciones",
            Category::MysticExperiences => "experiencias_misticas",
            Category::PhysicalPhenomena => "fenomenos_fisicos",
            Category::Witchcraft => "brujeria",
            Category::Other => "otros",
        }
    }

    pub fn menu_key(self) -> char {
        match self {
            Category::Ghosts => '1',
            Category::Ufos => '2',
            Category::Creatures => '3',
            Category::Premonitions => '4',
            Category::MysticExperiences => '5',
            Category::PhysicalPhenomena => '6',
            Category::Witchcraft => '7',
            Category::Other => '0',
        }
    }

    pub fn from_menu_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| key.len() == 1 && key.starts_with(c.menu_key()))
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }

    /// Allowed subcategories. Every category accepts `general`.
    pub fn subcategories(self) -> &'static [&'static str] {
        match self {
            Category::Ghosts => &[
                "cementerios",
                "casas_embrujadas",
                "apariciones_familiares",
                "hospitales",
                "rutas",
                "general",
            ],
            Category::Ufos => &[
                "avistamientos",
                "contacto_cercano",
                "abducciones",
                "luces_nocturnas",
                "general",
            ],
            Category::Creatures => &[
                "lobison",
                "duendes",
                "sombras",
                "hombres_de_negro",
                "general",
            ],
            Category::Premonitions => &[
                "suenos_premonitorios",
                "presentimientos",
                "deja_vu",
                "general",
            ],
            Category::MysticExperiences => &[
                "angeles",
                "seres_de_luz",
                "mensajes_fallecidos",
                "general",
            ],
            Category::PhysicalPhenomena => &[
                "objetos_que_se_mueven",
                "sonidos",
                "olores",
                "electricidad",
                "general",
            ],
            Category::Witchcraft => &["posesiones", "embrujos", "rituales", "general"],
            Category::Other => &["general"],
        }
    }

    pub fn has_subcategory(self, sub: &str) -> bool {
        self.subcategories().contains(&sub)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who tells the story.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Narrator {
    #[serde(rename = "oyente")]
    Listener,
    #[serde(rename = "conductor")]
    Host,
    #[serde(rename = "invitado")]
    Guest,
}

impl Narrator {
    pub const ALL: [Narrator; 3] = [Narrator::Listener, Narrator::Host, Narrator::Guest];

    pub fn as_str(self) -> &'static str {
        match self {
            Narrator::Listener => "oyente",
            Narrator::Host => "conductor",
            Narrator::Guest => "invitado",
        }
    }

    pub fn menu_key(self) -> char {
        match self {
            Narrator::Listener => '1',
            Narrator::Host => '2',
            Narrator::Guest => '3',
        }
    }

    pub fn from_menu_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|n| key.len() == 1 && key.starts_with(n.menu_key()))
    }
}

impl fmt::Display for Narrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
