use super::models::DataDragonChampions;
use std::collections::HashMap;

/// Champion id <-> display name table built from Data Dragon.
#[derive(Debug, Clone, Default)]
pub struct ChampionNames {
    by_id: HashMap<i64, String>,
    by_name: HashMap<String, i64>,
}

impl ChampionNames {
    pub fn from_data_dragon(champions: &DataDragonChampions) -> Self {
        let mut names = ChampionNames::default();
        for info in champions.data.values() {
            let Ok(id) = info.key.parse::<i64>() else {
                continue;
            };
            names.insert(id, &info.name);
            // "MonkeyKing" style ids are what some stat sites use
            names.by_name.insert(normalize(&info.id), id);
        }
        names
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (i64, &'a str)>) -> Self {
        let mut names = ChampionNames::default();
        for (id, name) in pairs {
            names.insert(id, name);
        }
        names
    }

    fn insert(&mut self, id: i64, name: &str) {
        self.by_id.insert(id, name.to_string());
        self.by_name.insert(normalize(name), id);
    }

    pub fn name(&self, id: i64) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    /// Resolves a display name, ignoring case, spaces and punctuation
    /// ("Kai'Sa", "kaisa" and "KaiSa" all match).
    pub fn id_for(&self, name: &str) -> Option<i64> {
        self.by_name.get(&normalize(name)).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
