//! Note type catalog
//!
//! Every falling note references one immutable [`NoteType`]. What happens on a
//! catch is described by a [`CatchEffect`] value, so adding a new grade never
//! touches the collision code.

use serde::{Deserialize, Serialize};

/// Sound cue identifiers raised by the simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    /// Ordinary grade caught
    Catch,
    /// Top grade caught
    Perfect,
    /// A damaging grade caught
    Damage,
    /// Run ended
    GameOver,
    /// Run started
    Start,
}

/// What a caught note does to the run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CatchEffect {
    pub score_delta: i64,
    pub life_delta: f32,
    #[serde(default)]
    pub cue: Option<SoundCue>,
    /// Start the damage flash
    #[serde(default)]
    pub notifies_damage: bool,
}

impl CatchEffect {
    /// Effect derived from plain score/life values: losing life counts as damage
    pub fn from_values(score_delta: i64, life_delta: f32) -> Self {
        let damaging = life_delta < 0.0;
        Self {
            score_delta,
            life_delta,
            cue: Some(if damaging {
                SoundCue::Damage
            } else {
                SoundCue::Catch
            }),
            notifies_damage: damaging,
        }
    }
}

/// An immutable note kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteType {
    pub name: String,
    pub spawn_weight: f32,
    pub score_value: i64,
    pub life_delta: f32,
    pub catch_effect: CatchEffect,
    /// Fallback fill when no image is available
    #[serde(default = "default_color")]
    pub color: [f32; 4],
    /// Image URL drawn for this kind
    #[serde(default)]
    pub asset: Option<String>,
}

fn default_color() -> [f32; 4] {
    [0.8, 0.8, 0.8, 1.0]
}

impl NoteType {
    pub fn new(name: impl Into<String>, spawn_weight: f32, score_value: i64, life_delta: f32) -> Self {
        Self {
            name: name.into(),
            spawn_weight,
            score_value,
            life_delta,
            catch_effect: CatchEffect::from_values(score_value, life_delta),
            color: default_color(),
            asset: None,
        }
    }

    pub fn with_effect(mut self, effect: CatchEffect) -> Self {
        self.catch_effect = effect;
        self
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }
}

/// Ordered, immutable registry with its weight total cached
#[derive(Debug, Clone, PartialEq)]
pub struct NoteRegistry {
    types: Vec<NoteType>,
    total_weight: f32,
}

/// Build a registry, caching the total spawn weight
pub fn build_registry(types: Vec<NoteType>) -> NoteRegistry {
    // Negative weights carry no probability mass
    let total_weight: f32 = types.iter().map(|t| t.spawn_weight.max(0.0)).sum();
    if types.is_empty() {
        log::warn!("Note registry is empty, nothing will spawn");
    } else if !(total_weight > 0.0) {
        log::warn!(
            "Note registry total weight is {}, every spawn falls back to '{}'",
            total_weight,
            types[types.len() - 1].name
        );
    }
    NoteRegistry {
        types,
        total_weight,
    }
}

impl NoteRegistry {
    /// The stock grade catalog: A through F
    pub fn grades() -> Self {
        build_registry(vec![
            NoteType::new("A", 8.0, 100, 0.25)
                .with_effect(CatchEffect {
                    score_delta: 100,
                    life_delta: 0.25,
                    cue: Some(SoundCue::Perfect),
                    notifies_damage: false,
                })
                .with_color([0.3, 0.9, 0.45, 1.0]),
            NoteType::new("B", 14.0, 50, 0.0).with_color([0.3, 0.75, 0.95, 1.0]),
            NoteType::new("C", 18.0, 25, 0.0).with_color([0.95, 0.85, 0.3, 1.0]),
            NoteType::new("D", 16.0, 10, -0.5).with_color([1.0, 0.55, 0.2, 1.0]),
            NoteType::new("F", 14.0, 0, -1.0).with_color([0.95, 0.25, 0.25, 1.0]),
        ])
    }

    pub fn total_weight(&self) -> f32 {
        self.total_weight
    }

    pub fn types(&self) -> &[NoteType] {
        &self.types
    }

    pub fn get(&self, index: usize) -> Option<&NoteType> {
        self.types.get(index)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Position of a kind by name (debugging and tests)
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.types.iter().position(|t| t.name == name)
    }
}

impl Default for NoteRegistry {
    fn default() -> Self {
        Self::grades()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_weight_cached() {
        let registry = build_registry(vec![
            NoteType::new("A", 1.0, 100, 0.25),
            NoteType::new("B", 3.0, 50, 0.0),
        ]);
        assert!((registry.total_weight() - 4.0).abs() < 1e-6);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_negative_weights_carry_no_mass() {
        let registry = build_registry(vec![
            NoteType::new("A", -5.0, 100, 0.0),
            NoteType::new("B", 2.0, 50, 0.0),
        ]);
        assert!((registry.total_weight() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_derived_effect_marks_damage() {
        let f = NoteType::new("F", 1.0, 0, -1.0);
        assert!(f.catch_effect.notifies_damage);
        assert_eq!(f.catch_effect.cue, Some(SoundCue::Damage));

        let b = NoteType::new("B", 1.0, 50, 0.0);
        assert!(!b.catch_effect.notifies_damage);
        assert_eq!(b.catch_effect.cue, Some(SoundCue::Catch));
    }

    #[test]
    fn test_grades_catalog() {
        let registry = NoteRegistry::grades();
        assert_eq!(registry.len(), 5);
        assert!(registry.total_weight() > 0.0);
        let a = registry.index_of("A").and_then(|i| registry.get(i)).unwrap();
        assert_eq!(a.catch_effect.cue, Some(SoundCue::Perfect));
        assert_eq!(registry.index_of("Z"), None);
    }

    #[test]
    fn test_note_type_json() {
        let json = r#"{"name":"S","spawn_weight":2.0,"score_value":500,"life_delta":1.0,
            "catch_effect":{"score_delta":500,"life_delta":1.0,"cue":"perfect"}}"#;
        let t: NoteType = serde_json::from_str(json).unwrap();
        assert_eq!(t.catch_effect.cue, Some(SoundCue::Perfect));
        assert!(!t.catch_effect.notifies_damage);
        assert_eq!(t.asset, None);
    }
}
