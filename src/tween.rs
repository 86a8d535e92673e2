//! A small stand-in for the host engine's tween manager.
//!
//! The original game leaned on its engine for every animation: fades, bobs,
//! glow pulses, and one-shot scale pops. This module provides the same
//! vocabulary as plain components driven by `Time`, plus the easing curves
//! those animations used. Rendering is optional; the tweens write to
//! [`Opacity`] and [`Transform`] and a render-gated system mirrors opacity
//! into sprite colours.

use bevy::prelude::*;

/// Easing curves used by the game's animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ease {
    /// Decelerating quadratic, the workhorse curve for fades and pans.
    #[default]
    QuadOut,
    /// Symmetric quadratic, used for gentle two-sided motion.
    QuadInOut,
    /// Sinusoidal in-out, used by the repeating bob and glow animations.
    SineInOut,
    /// Overshooting cubic, used when the overlay springs open.
    BackOut,
}

impl Ease {
    /// Maps linear progress `t` in `[0, 1]` onto the curve.
    ///
    /// Inputs outside the unit interval are clamped before shaping, except
    /// that [`Ease::BackOut`] is evaluated at the clamped endpoint exactly so
    /// the overshoot always settles at 1.
    #[must_use]
    pub fn sample(self, progress: f32) -> f32 {
        let t = progress.clamp(0.0, 1.0);
        match self {
            Self::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
            Self::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - 2.0 * (1.0 - t) * (1.0 - t)
                }
            }
            Self::SineInOut => 0.5 * (1.0 - (std::f32::consts::PI * t).cos()),
            Self::BackOut => {
                const C1: f32 = 1.701_58;
                const C3: f32 = C1 + 1.0;
                let u = t - 1.0;
                1.0 + C3 * u * u * u + C1 * u * u
            }
        }
    }
}

/// Scalar opacity for an entity's visuals, in `[0, 1]`.
///
/// Game logic animates this value; the sprite layer reads it. Entities
/// without visuals may still carry it so the logic stays renderer-agnostic.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Opacity(pub f32);

impl Default for Opacity {
    fn default() -> Self {
        Self(1.0)
    }
}

/// One-shot opacity tween; removed from the entity when it completes.
#[derive(Component, Debug)]
pub struct Fade {
    /// Opacity at the start of the tween.
    pub from: f32,
    /// Opacity once the tween completes.
    pub to: f32,
    /// Curve shaping the transition.
    pub ease: Ease,
    /// Progress clock.
    pub timer: Timer,
}

impl Fade {
    /// Creates a fade from `from` to `to` over `seconds`.
    #[must_use]
    pub fn new(from: f32, to: f32, seconds: f32, ease: Ease) -> Self {
        Self {
            from,
            to,
            ease,
            timer: Timer::from_seconds(seconds, TimerMode::Once),
        }
    }
}

/// Repeating vertical bob around a fixed base height.
///
/// Mirrors the original's yoyo sine tweens: offset rises from zero to
/// `amplitude` and back once per `period`.
#[derive(Component, Debug, Clone)]
pub struct Bob {
    /// Y coordinate the entity oscillates around.
    pub base_y: f32,
    /// Peak offset from the base, in world units.
    pub amplitude: f32,
    /// Seconds for one full up-and-down cycle.
    pub period: f32,
    /// Seconds elapsed since the bob started.
    pub elapsed: f32,
}

impl Bob {
    /// Creates a bob around `base_y`.
    #[must_use]
    pub const fn new(base_y: f32, amplitude: f32, period: f32) -> Self {
        Self {
            base_y,
            amplitude,
            period,
            elapsed: 0.0,
        }
    }

    /// Offset from the base at `elapsed` seconds into the cycle.
    #[must_use]
    pub fn offset(&self) -> f32 {
        if self.period <= f32::EPSILON {
            return 0.0;
        }
        let phase = (self.elapsed / self.period).fract();
        self.amplitude * Ease::SineInOut.sample(yoyo(phase))
    }
}

/// Repeating opacity pulse between two levels, for glow effects.
#[derive(Component, Debug, Clone)]
pub struct GlowPulse {
    /// Dimmest opacity in the cycle.
    pub low: f32,
    /// Brightest opacity in the cycle.
    pub high: f32,
    /// Seconds for one full dim-bright-dim cycle.
    pub period: f32,
    /// Seconds elapsed since the pulse started.
    pub elapsed: f32,
}

impl GlowPulse {
    /// Creates a pulse between `low` and `high`.
    #[must_use]
    pub const fn new(low: f32, high: f32, period: f32) -> Self {
        Self {
            low,
            high,
            period,
            elapsed: 0.0,
        }
    }

    /// Opacity at `elapsed` seconds into the cycle.
    #[must_use]
    pub fn level(&self) -> f32 {
        if self.period <= f32::EPSILON {
            return self.high;
        }
        let phase = (self.elapsed / self.period).fract();
        self.low + (self.high - self.low) * Ease::SineInOut.sample(yoyo(phase))
    }
}

/// One-shot yoyo scale pop; restores the base scale when it completes.
#[derive(Component, Debug)]
pub struct ScalePulse {
    /// Uniform scale the entity returns to.
    pub base: f32,
    /// Uniform scale at the peak of the pop.
    pub peak: f32,
    /// Progress clock for the whole up-and-down motion.
    pub timer: Timer,
}

impl ScalePulse {
    /// Creates a pop from `base` to `peak` and back over `seconds`.
    #[must_use]
    pub fn new(base: f32, peak: f32, seconds: f32) -> Self {
        Self {
            base,
            peak,
            timer: Timer::from_seconds(seconds, TimerMode::Once),
        }
    }
}

/// Folds cycle progress in `[0, 1]` into an up-then-down ramp.
fn yoyo(phase: f32) -> f32 {
    1.0 - (1.0 - 2.0 * phase).abs()
}

/// Advances [`Fade`] tweens and retires the finished ones.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn fade_system(
    mut commands: Commands,
    time: Res<Time>,
    mut fades: Query<(Entity, &mut Fade, &mut Opacity)>,
) {
    for (entity, mut fade, mut opacity) in &mut fades {
        fade.timer.tick(time.delta());
        let t = fade.timer.fraction();
        opacity.0 = fade.from + (fade.to - fade.from) * fade.ease.sample(t);
        if fade.timer.finished() {
            opacity.0 = fade.to;
            commands.entity(entity).remove::<Fade>();
        }
    }
}

/// Advances [`Bob`] oscillations.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn bob_system(time: Res<Time>, mut bobs: Query<(&mut Bob, &mut Transform)>) {
    for (mut bob, mut transform) in &mut bobs {
        bob.elapsed += time.delta_secs();
        transform.translation.y = bob.base_y + bob.offset();
    }
}

/// Advances [`GlowPulse`] cycles.
///
/// Entities mid-[`Fade`] are skipped so one-shot fades win over the ambient
/// pulse, matching how the original killed glow tweens before fading icons.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn glow_pulse_system(
    time: Res<Time>,
    mut pulses: Query<(&mut GlowPulse, &mut Opacity), Without<Fade>>,
) {
    for (mut pulse, mut opacity) in &mut pulses {
        pulse.elapsed += time.delta_secs();
        opacity.0 = pulse.level();
    }
}

/// Advances [`ScalePulse`] pops and restores the base scale afterwards.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn scale_pulse_system(
    mut commands: Commands,
    time: Res<Time>,
    mut pulses: Query<(Entity, &mut ScalePulse, &mut Transform)>,
) {
    for (entity, mut pulse, mut transform) in &mut pulses {
        pulse.timer.tick(time.delta());
        if pulse.timer.finished() {
            transform.scale = Vec3::splat(pulse.base);
            commands.entity(entity).remove::<ScalePulse>();
            continue;
        }
        let t = yoyo(pulse.timer.fraction());
        let scale = pulse.base + (pulse.peak - pulse.base) * Ease::QuadOut.sample(t);
        transform.scale = Vec3::splat(scale);
    }
}

/// Mirrors [`Opacity`] into sprite colours.
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
pub fn apply_opacity_to_sprites(mut sprites: Query<(&Opacity, &mut Sprite), Changed<Opacity>>) {
    for (opacity, mut sprite) in &mut sprites {
        let alpha = opacity.0.clamp(0.0, 1.0);
        sprite.color = sprite.color.with_alpha(alpha);
    }
}

/// Plugin driving every tween component each frame.
#[derive(Debug, Default)]
pub struct TweenPlugin;

impl Plugin for TweenPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (fade_system, bob_system, glow_pulse_system, scale_pulse_system),
        );
        #[cfg(feature = "render")]
        app.add_systems(PostUpdate, apply_opacity_to_sprites);
    }
}
