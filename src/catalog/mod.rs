pub mod models;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

pub use models::{Catalog, Channel, Program, SearchHit, SearchHitKind};

impl Catalog {
    /// Load a catalog from a YAML or JSON file, keyed on extension.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file: {}", path.display()))?;

        let catalog: Catalog = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse catalog: {}", path.display()))?,
            _ => serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse catalog: {}", path.display()))?,
        };

        anyhow::ensure!(
            !catalog.channels.is_empty(),
            "Catalog has no channels: {}",
            path.display()
        );
        Ok(catalog)
    }

    pub fn channel(&self, id: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.id == id)
    }

    pub fn programs_for(&self, channel_id: &str) -> Vec<&Program> {
        self.programs
            .iter()
            .filter(|p| p.channel_id == channel_id)
            .collect()
    }

    /// Case-insensitive substring search over channels and programs.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        let matches = |text: &str| text.to_lowercase().contains(&query);

        let mut hits = Vec::new();

        for channel in &self.channels {
            let hit = matches(&channel.name)
                || channel.current_show.as_deref().is_some_and(matches)
                || channel.description.as_deref().is_some_and(matches);
            if hit {
                hits.push(SearchHit {
                    kind: SearchHitKind::Channel,
                    title: channel.name.clone(),
                    subtitle: channel
                        .current_show
                        .clone()
                        .unwrap_or_else(|| format!("Chaîne {}", channel.number)),
                    channel_id: channel.id.clone(),
                });
            }
        }

        for program in &self.programs {
            let hit = matches(&program.title)
                || program.description.as_deref().is_some_and(matches)
                || program.genre.as_deref().is_some_and(matches);
            if hit {
                let channel_name = self
                    .channel(&program.channel_id)
                    .map(|c| c.name.clone())
                    .unwrap_or_default();
                hits.push(SearchHit {
                    kind: SearchHitKind::Program,
                    title: program.title.clone(),
                    subtitle: format!("{}  {}", channel_name, program.time_range()),
                    channel_id: program.channel_id.clone(),
                });
            }
        }

        hits
    }

    /// Default catalog shipped with the application, used when the config
    /// names no catalog file.
    pub fn builtin() -> Self {
        let channels = vec![
            Channel {
                id: "tf1".into(),
                number: "1".into(),
                name: "TF1".into(),
                country: Some("France".into()),
                url: "https://test-streams.mux.dev/x36xhzz/x36xhzz.m3u8".into(),
                logo: Some("https://static.epg.best/fr/TF1.png".into()),
                current_show: Some("Journal de 20h".into()),
                description: Some("Actualités et informations du jour".into()),
                is_live: true,
            },
            Channel {
                id: "france2".into(),
                number: "2".into(),
                name: "France 2".into(),
                country: Some("France".into()),
                url: "https://test-streams.mux.dev/test_001/stream.m3u8".into(),
                logo: Some("https://static.epg.best/fr/France2.png".into()),
                current_show: Some("Plus belle la vie".into()),
                description: Some("Série dramatique française".into()),
                is_live: true,
            },
            Channel {
                id: "canalplus".into(),
                number: "4".into(),
                name: "Canal+".into(),
                country: Some("France".into()),
                url: "http://sample.vodobox.net/skate_phantom_flex_4k/skate_phantom_flex_4k.m3u8"
                    .into(),
                logo: Some("https://static.epg.best/fr/CanalPlus.png".into()),
                current_show: Some("Film: Inception".into()),
                description: Some("Thriller de science-fiction".into()),
                is_live: true,
            },
            Channel {
                id: "m6".into(),
                number: "6".into(),
                name: "M6".into(),
                country: Some("France".into()),
                url: "https://test-streams.mux.dev/pts_shift/master.m3u8".into(),
                logo: Some("https://static.epg.best/fr/M6.png".into()),
                current_show: Some("Top Chef".into()),
                description: Some("Concours culinaire".into()),
                is_live: true,
            },
            Channel {
                id: "arte".into(),
                number: "7".into(),
                name: "Arte".into(),
                country: Some("France".into()),
                url: "https://artesimulcast.akamaized.net/hls/live/2030993/artelive_fr/index.m3u8"
                    .into(),
                logo: Some("https://static.epg.best/fr/Arte.png".into()),
                current_show: Some("Le dessous des cartes".into()),
                description: Some("Magazine géopolitique".into()),
                is_live: true,
            },
        ];

        let programs = vec![
            Program {
                channel_id: "tf1".into(),
                title: "Journal de 20h".into(),
                start: "20:00".into(),
                end: "21:00".into(),
                description: Some("Actualités et informations du jour".into()),
                genre: Some("Information".into()),
            },
            Program {
                channel_id: "tf1".into(),
                title: "Demain nous appartient".into(),
                start: "19:10".into(),
                end: "20:00".into(),
                description: Some("Feuilleton quotidien".into()),
                genre: Some("Série".into()),
            },
            Program {
                channel_id: "france2".into(),
                title: "Plus belle la vie".into(),
                start: "20:00".into(),
                end: "20:45".into(),
                description: Some("Série dramatique française".into()),
                genre: Some("Série".into()),
            },
            Program {
                channel_id: "france2".into(),
                title: "Envoyé spécial".into(),
                start: "20:45".into(),
                end: "22:30".into(),
                description: Some("Magazine d'investigation".into()),
                genre: Some("Magazine".into()),
            },
            Program {
                channel_id: "canalplus".into(),
                title: "Inception".into(),
                start: "21:00".into(),
                end: "23:30".into(),
                description: Some("Thriller de science-fiction".into()),
                genre: Some("Cinéma".into()),
            },
            Program {
                channel_id: "m6".into(),
                title: "Top Chef".into(),
                start: "21:10".into(),
                end: "23:20".into(),
                description: Some("Concours culinaire".into()),
                genre: Some("Divertissement".into()),
            },
            Program {
                channel_id: "arte".into(),
                title: "Le dessous des cartes".into(),
                start: "19:45".into(),
                end: "20:05".into(),
                description: Some("Magazine géopolitique".into()),
                genre: Some("Documentaire".into()),
            },
        ];

        Self { channels, programs }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_consistent() {
        let catalog = Catalog::builtin();
        assert!(!catalog.channels.is_empty());
        for program in &catalog.programs {
            assert!(
                catalog.channel(&program.channel_id).is_some(),
                "program {} references unknown channel {}",
                program.title,
                program.channel_id
            );
        }
    }

    #[test]
    fn search_matches_channels_and_programs() {
        let catalog = Catalog::builtin();

        let hits = catalog.search("chef");
        assert!(hits.iter().any(|h| h.kind == SearchHitKind::Channel));
        assert!(hits.iter().any(|h| h.kind == SearchHitKind::Program));
        assert!(hits.iter().all(|h| h.channel_id == "m6"));
    }

    #[test]
    fn search_is_case_insensitive_and_trims() {
        let catalog = Catalog::builtin();
        assert!(!catalog.search("  INCEPTION ").is_empty());
    }

    #[test]
    fn empty_query_returns_nothing() {
        let catalog = Catalog::builtin();
        assert!(catalog.search("   ").is_empty());
    }

    #[test]
    fn load_parses_yaml_and_json() {
        let dir = std::env::temp_dir();

        let yaml_path = dir.join("zappeur_catalog_test.yml");
        std::fs::write(
            &yaml_path,
            "channels:\n  - id: one\n    number: \"1\"\n    name: One\n    url: https://host/live.m3u8\n",
        )
        .unwrap();
        let catalog = Catalog::load(&yaml_path).unwrap();
        assert_eq!(catalog.channels.len(), 1);
        assert!(catalog.programs.is_empty());

        let json_path = dir.join("zappeur_catalog_test.json");
        std::fs::write(
            &json_path,
            r#"{"channels":[{"id":"one","number":"1","name":"One","url":"https://host/live.m3u8"}]}"#,
        )
        .unwrap();
        let catalog = Catalog::load(&json_path).unwrap();
        assert_eq!(catalog.channels[0].name, "One");
    }

    #[test]
    fn load_rejects_empty_channel_list() {
        let path = std::env::temp_dir().join("zappeur_catalog_empty.yml");
        std::fs::write(&path, "channels: []\n").unwrap();
        assert!(Catalog::load(&path).is_err());
    }
}
