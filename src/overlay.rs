//! The content overlay shown when an orb is engaged.
//!
//! Opening an orb freezes player movement, dims the world behind a backdrop,
//! and springs a panel open over the map with the entry's details. The panel
//! body scrolls with the mouse wheel, clamped so the text can never be
//! dragged fully out of view, and `Escape` closes the overlay and releases
//! the orb back into its recovery phase.
//!
//! The open/closed state and scroll arithmetic are plain data so they test
//! headlessly; only the widget tree itself needs the render feature.

use bevy::input::keyboard::KeyCode;
use bevy::input::ButtonInput;
use bevy::prelude::*;

use crate::constants::{
    OVERLAY_HEIGHT_FRACTION, OVERLAY_MAX_HEIGHT, OVERLAY_MAX_WIDTH, OVERLAY_OPEN_SECONDS,
    OVERLAY_WIDTH_FRACTION,
};
use crate::content::{Catalog, ContentEntry, SectionKind};
use crate::layout::ViewportSize;
use crate::orbs::{OrbActivated, OrbReleased};

/// Pixels scrolled per mouse wheel line.
const SCROLL_LINE_PX: f32 = 24.0;

/// Whether the overlay is showing, and for which orb.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    /// No overlay; the player roams freely.
    #[default]
    Closed,
    /// Overlay open for an engaged orb; movement is frozen.
    Open {
        /// The orb that opened the overlay.
        orb: Entity,
    },
}

impl OverlayState {
    /// Whether an overlay is currently open.
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open { .. })
    }
}

/// Current scroll offset of the overlay body, in pixels.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct OverlayScroll(pub f32);

/// Clamps a scroll offset so the body stays within the visible range.
///
/// Content shorter than the view cannot scroll at all.
#[must_use]
pub fn clamp_scroll(offset: f32, content_height: f32, view_height: f32) -> f32 {
    let limit = (content_height - view_height).max(0.0);
    offset.clamp(0.0, limit)
}

/// Panel size for a viewport: a fraction of each axis, capped.
#[must_use]
pub fn panel_size(viewport: Vec2) -> Vec2 {
    Vec2::new(
        (viewport.x * OVERLAY_WIDTH_FRACTION).min(OVERLAY_MAX_WIDTH),
        (viewport.y * OVERLAY_HEIGHT_FRACTION).min(OVERLAY_MAX_HEIGHT),
    )
}

/// Header line for an entry: title plus its origin and period.
#[must_use]
pub fn header_text(entry: &ContentEntry) -> String {
    format!(
        "{}\n{} | {}",
        entry.title, entry.organisation, entry.period
    )
}

/// Body text for an entry: summary, technology list, and highlights.
#[must_use]
pub fn body_text(entry: &ContentEntry) -> String {
    let mut body = entry.summary.clone();
    if !entry.technologies.is_empty() {
        body.push_str("\n\nTechnologies: ");
        body.push_str(&entry.technologies.join(" / "));
    }
    if !entry.highlights.is_empty() {
        body.push_str("\n\nKey Achievements:");
        for highlight in &entry.highlights {
            body.push_str("\n- ");
            body.push_str(highlight);
        }
    }
    body
}

/// Root node of the overlay widget tree.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayRoot;

/// The sized panel inside the backdrop.
#[derive(Component, Debug)]
pub struct OverlayPanel {
    /// Full size the panel springs open to.
    pub target: Vec2,
    /// Progress clock for the opening animation.
    pub timer: Timer,
}

/// The clipped scroll viewport under the header.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayBody;

/// The content column that slides inside the body viewport.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayContent;

/// Opens the overlay for an activated orb.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy observer parameters use `Res<T>` by value."
)]
fn on_orb_activated(
    activated: On<OrbActivated>,
    mut commands: Commands,
    mut state: ResMut<OverlayState>,
    mut scroll: ResMut<OverlayScroll>,
    catalog: Res<Catalog>,
    viewport: Res<ViewportSize>,
) {
    if state.is_open() {
        return;
    }
    let event = activated.event();
    let Some(entry) = catalog.entries(event.kind).get(event.index) else {
        log::warn!(
            "orb {:?} #{} has no catalog entry",
            event.kind,
            event.index
        );
        return;
    };
    log::info!("overlay open: {:?} \"{}\"", event.kind, entry.title);
    *state = OverlayState::Open { orb: event.orb };
    scroll.0 = 0.0;
    spawn_overlay_ui(&mut commands, event.kind, entry, viewport.0);
}

/// Closes the overlay on `Escape` and releases its orb.
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn close_on_escape(
    mut commands: Commands,
    keys: Res<ButtonInput<KeyCode>>,
    mut state: ResMut<OverlayState>,
    roots: Query<Entity, With<OverlayRoot>>,
) {
    let OverlayState::Open { orb } = *state else {
        return;
    };
    if !keys.just_pressed(KeyCode::Escape) {
        return;
    }
    log::info!("overlay closed");
    *state = OverlayState::Closed;
    for root in &roots {
        commands.entity(root).despawn();
    }
    commands.trigger(OrbReleased { orb });
}

/// Builds the overlay widget tree.
#[cfg(feature = "render")]
fn spawn_overlay_ui(commands: &mut Commands, kind: SectionKind, entry: &ContentEntry, viewport: Vec2) {
    use bevy::ui::{
        AlignItems, FlexDirection, JustifyContent, Node, Overflow, PositionType, UiRect, Val,
    };

    let size = panel_size(viewport);
    commands
        .spawn((
            OverlayRoot,
            Name::new(format!("overlay {kind:?}")),
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..Default::default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.55)),
        ))
        .with_children(|backdrop| {
            backdrop
                .spawn((
                    OverlayPanel {
                        target: size,
                        timer: Timer::from_seconds(OVERLAY_OPEN_SECONDS, TimerMode::Once),
                    },
                    Node {
                        width: Val::Px(0.0),
                        height: Val::Px(0.0),
                        flex_direction: FlexDirection::Column,
                        overflow: Overflow::clip(),
                        padding: UiRect::all(Val::Px(12.0)),
                        ..Default::default()
                    },
                    BackgroundColor(Color::srgba(0.08, 0.08, 0.14, 0.95)),
                ))
                .with_children(|panel| {
                    panel
                        .spawn(Node {
                            flex_direction: FlexDirection::Row,
                            align_items: AlignItems::Center,
                            column_gap: Val::Px(8.0),
                            ..Default::default()
                        })
                        .with_children(|header| {
                            // Stand-in for the entry's logo image.
                            header.spawn((
                                Node {
                                    width: Val::Px(24.0),
                                    height: Val::Px(24.0),
                                    ..Default::default()
                                },
                                BackgroundColor(Color::srgb(0.3, 0.55, 0.9)),
                            ));
                            header.spawn((
                                Text::new(header_text(entry)),
                                TextColor(Color::srgb(1.0, 0.85, 0.3)),
                            ));
                        });
                    panel
                        .spawn((
                            OverlayBody,
                            Node {
                                flex_direction: FlexDirection::Column,
                                flex_grow: 1.0,
                                overflow: Overflow::clip_y(),
                                ..Default::default()
                            },
                        ))
                        .with_children(|body| {
                            body.spawn((
                                OverlayContent,
                                Node {
                                    position_type: PositionType::Relative,
                                    top: Val::Px(0.0),
                                    flex_direction: FlexDirection::Column,
                                    ..Default::default()
                                },
                            ))
                            .with_children(|content| {
                                content.spawn((
                                    Text::new(body_text(entry)),
                                    TextColor(Color::srgb(0.92, 0.92, 0.92)),
                                ));
                            });
                        });
                });
        });
}

/// Headless stand-in so opening still tracks state without a widget tree.
#[cfg(not(feature = "render"))]
fn spawn_overlay_ui(commands: &mut Commands, kind: SectionKind, _entry: &ContentEntry, _viewport: Vec2) {
    commands.spawn((OverlayRoot, Name::new(format!("overlay {kind:?}"))));
}

/// Springs the panel open towards its target size.
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn animate_panel_open(
    time: Res<Time>,
    mut panels: Query<(&mut OverlayPanel, &mut bevy::ui::Node)>,
) {
    use bevy::ui::Val;

    use crate::tween::Ease;

    for (mut panel, mut node) in &mut panels {
        if panel.timer.finished() {
            continue;
        }
        panel.timer.tick(time.delta());
        let t = Ease::BackOut.sample(panel.timer.fraction());
        node.width = Val::Px(panel.target.x * t);
        node.height = Val::Px(panel.target.y * t);
    }
}

/// Scrolls the overlay body with the mouse wheel.
#[cfg(feature = "render")]
#[cfg_attr(docsrs, doc(cfg(feature = "render")))]
#[expect(
    clippy::needless_pass_by_value,
    reason = "Bevy system parameters use `Res<T>` by value."
)]
pub fn scroll_overlay_body(
    mut wheel: MessageReader<bevy::input::mouse::MouseWheel>,
    state: Res<OverlayState>,
    mut scroll: ResMut<OverlayScroll>,
    bodies: Query<&bevy::ui::ComputedNode, With<OverlayBody>>,
    mut contents: Query<(&mut bevy::ui::Node, &bevy::ui::ComputedNode), With<OverlayContent>>,
) {
    use bevy::ui::Val;

    if !state.is_open() {
        wheel.clear();
        return;
    }
    let mut delta = 0.0;
    for event in wheel.read() {
        delta += event.y * SCROLL_LINE_PX;
    }
    if delta.abs() <= f32::EPSILON {
        return;
    }
    let Ok((mut node, content_computed)) = contents.single_mut() else {
        return;
    };
    // The body node is the clipped viewport; its height excludes the header
    // and the panel padding, so the clamp sees exactly the visible range.
    let view_height = bodies
        .single()
        .map_or(0.0, |computed| computed.size().y);
    scroll.0 = clamp_scroll(scroll.0 - delta, content_computed.size().y, view_height);
    node.top = Val::Px(-scroll.0);
}

/// Plugin owning the overlay state and widgets.
#[derive(Debug, Default)]
pub struct OverlayPlugin;

impl Plugin for OverlayPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OverlayState>();
        app.init_resource::<OverlayScroll>();
        app.add_systems(Update, close_on_escape);
        #[cfg(feature = "render")]
        app.add_systems(Update, (animate_panel_open, scroll_overlay_body));
        app.add_observer(on_orb_activated);
    }
}
