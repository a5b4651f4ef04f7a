//! Render primitives produced by the draw pass.
//!
//! The overlay does not render. Each call to
//! [`Overlay::draw`](crate::overlay::Overlay::draw) fills a [`DrawList`]
//! with screen-space [`DrawCommand`]s that the host maps onto its own sprite
//! containers. Building the list reads simulation state only, so the same
//! state and `time_stacker` always produce an identical list.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::host::CreatureKind;

/// Which host container a primitive belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Layer {
    /// HUD container, above the game.
    Hud,
    /// The camera's bloom container, blended into the world.
    Bloom,
}

/// Shader family of a point sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpriteStyle {
    /// Soft round flat light.
    Glow,
    /// Single hologram pixel.
    HologramDot,
}

/// One primitive in screen space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// A hologram line from `from` to `to`.
    Line {
        layer: Layer,
        from: Vec2,
        to: Vec2,
        color: Color,
        alpha: f32,
    },
    /// A scaled, rotated point sprite.
    Sprite {
        layer: Layer,
        style: SpriteStyle,
        pos: Vec2,
        scale: Vec2,
        /// Degrees clockwise, applied to the sprite's local axes.
        rotation: f32,
        color: Color,
        alpha: f32,
    },
    /// The host's creature badge for `kind`, with its drop shadows.
    Symbol {
        kind: CreatureKind,
        pos: Vec2,
        scale: f32,
        color: Color,
        alpha: f32,
        /// Attention flash intensity; the overlay always sends `0`.
        flash: f32,
    },
}

/// Ordered primitives for one frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Symbol { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    pub fn sprites(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Sprite { .. }))
    }
}

impl DrawCommand {
    pub fn alpha(&self) -> f32 {
        match self {
            DrawCommand::Line { alpha, .. }
            | DrawCommand::Sprite { alpha, .. }
            | DrawCommand::Symbol { alpha, .. } => *alpha,
        }
    }
}
