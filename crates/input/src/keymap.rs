use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::event::InputEvent;

/// Keys a front end may report. Only a handful matter for the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    Enter,
    Escape,
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    /// A printable key, stored lowercase.
    Char(char),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Space => f.write_str("Space"),
            Key::Enter => f.write_str("Enter"),
            Key::Escape => f.write_str("Escape"),
            Key::ArrowUp => f.write_str("ArrowUp"),
            Key::ArrowDown => f.write_str("ArrowDown"),
            Key::ArrowLeft => f.write_str("ArrowLeft"),
            Key::ArrowRight => f.write_str("ArrowRight"),
            Key::Char(c) => write!(f, "{}", c.to_ascii_uppercase()),
        }
    }
}

impl FromStr for Key {
    type Err = BindingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = match s.to_ascii_lowercase().as_str() {
            "space" | " " => Key::Space,
            "enter" | "return" => Key::Enter,
            "escape" | "esc" => Key::Escape,
            "arrowup" | "up" => Key::ArrowUp,
            "arrowdown" | "down" => Key::ArrowDown,
            "arrowleft" | "left" => Key::ArrowLeft,
            "arrowright" | "right" => Key::ArrowRight,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_graphic() => Key::Char(c),
                    _ => return Err(BindingError::UnknownKey(s.to_owned())),
                }
            }
        };
        Ok(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyPhase {
    Pressed,
    Released,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BindingError {
    #[error("unknown key name: {0:?}")]
    UnknownKey(String),

    #[error("{key} ({phase:?}) is already bound to {existing:?}")]
    AlreadyBound {
        key: Key,
        phase: KeyPhase,
        existing: InputEvent,
    },
}

/// Key bindings as data. Translates key transitions into input events.
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: HashMap<(Key, KeyPhase), InputEvent>,
}

impl Default for KeyMap {
    fn default() -> Self {
        let mut bindings = HashMap::new();
        bindings.insert((Key::Space, KeyPhase::Pressed), InputEvent::JumpPressed);
        bindings.insert((Key::ArrowUp, KeyPhase::Pressed), InputEvent::JumpPressed);
        bindings.insert((Key::ArrowDown, KeyPhase::Pressed), InputEvent::DuckPressed);
        bindings.insert((Key::ArrowDown, KeyPhase::Released), InputEvent::DuckReleased);
        bindings.insert((Key::Enter, KeyPhase::Pressed), InputEvent::RestartPressed);
        bindings.insert((Key::Char('r'), KeyPhase::Pressed), InputEvent::RestartPressed);
        Self { bindings }
    }
}

impl KeyMap {
    /// A map with no bindings at all.
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bind a key transition. Refuses to silently replace an existing
    /// binding; call [`KeyMap::unbind`] first to move it.
    pub fn bind(
        &mut self,
        key: Key,
        phase: KeyPhase,
        event: InputEvent,
    ) -> Result<(), BindingError> {
        let key = normalize(key);
        if let Some(&existing) = self.bindings.get(&(key, phase)) {
            if existing != event {
                return Err(BindingError::AlreadyBound {
                    key,
                    phase,
                    existing,
                });
            }
        }
        self.bindings.insert((key, phase), event);
        Ok(())
    }

    /// Remove a binding, returning the event it produced.
    pub fn unbind(&mut self, key: Key, phase: KeyPhase) -> Option<InputEvent> {
        self.bindings.remove(&(normalize(key), phase))
    }

    /// The event a key transition produces, if it is bound.
    pub fn translate(&self, key: Key, phase: KeyPhase) -> Option<InputEvent> {
        self.bindings.get(&(normalize(key), phase)).copied()
    }

    /// Every key bound to `event`, in display order.
    pub fn keys_for(&self, event: InputEvent) -> Vec<Key> {
        let mut keys: Vec<Key> = self
            .bindings
            .iter()
            .filter(|(_, e)| **e == event)
            .map(|((key, _), _)| *key)
            .collect();
        keys.sort_by_key(|k| k.to_string());
        keys.dedup();
        keys
    }
}

fn normalize(key: Key) -> Key {
    match key {
        Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings() {
        let map = KeyMap::default();
        assert_eq!(
            map.translate(Key::Space, KeyPhase::Pressed),
            Some(InputEvent::JumpPressed)
        );
        assert_eq!(
            map.translate(Key::ArrowUp, KeyPhase::Pressed),
            Some(InputEvent::JumpPressed)
        );
        assert_eq!(
            map.translate(Key::ArrowDown, KeyPhase::Pressed),
            Some(InputEvent::DuckPressed)
        );
        assert_eq!(
            map.translate(Key::ArrowDown, KeyPhase::Released),
            Some(InputEvent::DuckReleased)
        );
        assert_eq!(
            map.translate(Key::Char('R'), KeyPhase::Pressed),
            Some(InputEvent::RestartPressed)
        );
        assert_eq!(map.translate(Key::Space, KeyPhase::Released), None);
        assert_eq!(map.translate(Key::ArrowLeft, KeyPhase::Pressed), None);
    }

    #[test]
    fn rebinding_requires_unbind() {
        let mut map = KeyMap::default();
        let err = map
            .bind(Key::Space, KeyPhase::Pressed, InputEvent::DuckPressed)
            .unwrap_err();
        assert!(matches!(
            err,
            BindingError::AlreadyBound {
                existing: InputEvent::JumpPressed,
                ..
            }
        ));
        // Same binding again is fine.
        map.bind(Key::Space, KeyPhase::Pressed, InputEvent::JumpPressed)
            .unwrap();

        assert_eq!(
            map.unbind(Key::Space, KeyPhase::Pressed),
            Some(InputEvent::JumpPressed)
        );
        map.bind(Key::Space, KeyPhase::Pressed, InputEvent::DuckPressed)
            .unwrap();
        assert_eq!(
            map.translate(Key::Space, KeyPhase::Pressed),
            Some(InputEvent::DuckPressed)
        );
    }

    #[test]
    fn parse_key_names() {
        assert_eq!("space".parse::<Key>(), Ok(Key::Space));
        assert_eq!("ArrowDown".parse::<Key>(), Ok(Key::ArrowDown));
        assert_eq!("W".parse::<Key>(), Ok(Key::Char('w')));
        assert_eq!(
            "hyper".parse::<Key>(),
            Err(BindingError::UnknownKey("hyper".into()))
        );
    }

    #[test]
    fn keys_for_lists_every_binding() {
        let map = KeyMap::default();
        assert_eq!(
            map.keys_for(InputEvent::JumpPressed),
            vec![Key::ArrowUp, Key::Space]
        );
        assert_eq!(
            map.keys_for(InputEvent::RestartPressed),
            vec![Key::Enter, Key::Char('r')]
        );
        assert!(KeyMap::empty().is_empty());
    }
}
