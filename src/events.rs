use bevy_ecs::prelude::{Entity, Resource};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    FirstPerson,
    ThirdPerson,
}

impl CameraMode {
    pub fn as_str(self) -> &'static str {
        match self {
            CameraMode::FirstPerson => "first_person",
            CameraMode::ThirdPerson => "third_person",
        }
    }
}

#[derive(Debug, Clone)]
pub enum GameEvent {
    SceneSpawned { entities: usize },
    SegmentReached { entity: Entity, origin: usize, target: usize },
    CameraModeChanged { mode: CameraMode },
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameEvent::SceneSpawned { entities } => {
                write!(f, "SceneSpawned entities={entities}")
            }
            GameEvent::SegmentReached { entity, origin, target } => {
                write!(f, "SegmentReached entity={} origin={origin} target={target}", entity.index())
            }
            GameEvent::CameraModeChanged { mode } => {
                write!(f, "CameraModeChanged mode={}", mode.as_str())
            }
        }
    }
}

#[derive(Default, Resource)]
pub struct EventBus {
    events: Vec<GameEvent>,
}

impl EventBus {
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
