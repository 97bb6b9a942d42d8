//! CivSim Viewer - Bevy-based visualization for the simulation
//!
//! Controls:
//!   Space        pause / resume
//!   + / -        double / halve the tick rate
//!   R            restart with the same seed
//!   WASD/arrows  pan, mouse wheel zooms
//!
//! Beside the grid, two panels plot population and mean health per tick.

use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;
use civsim_core::{SimConfig, SimulationEngine, TickStats};

/// World units per grid cell.
const CELL: f32 = 10.0;

/// Health at which an agent is drawn fully green.
const FULL_HEALTH_COLOR: f32 = 15.0;

/// Size of one history panel in world units.
const CHART_SIZE: Vec2 = Vec2::new(240.0, 120.0);

/// Gap between the grid and the panels, and between stacked panels.
const CHART_GAP: f32 = 24.0;

fn main() {
    let config = SimConfig::default();
    let engine = match SimulationEngine::new(config.clone()) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("Invalid simulation config: {}", e);
            std::process::exit(1);
        }
    };

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "CivSim - Grid Civilization".to_string(),
                resolution: (1024.0, 768.0).into(),
                present_mode: bevy::window::PresentMode::AutoVsync,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(SimWrapper(engine))
        .insert_resource(SimSettings(config))
        .insert_resource(CameraState::default())
        .insert_resource(ViewerConfig::default())
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            (
                update_simulation,
                camera_controls,
                render_grid,
                render_agents,
                render_history,
                update_text_ui,
            ),
        )
        .run();
}

#[derive(Resource)]
struct SimWrapper(SimulationEngine);

/// Config used to (re)start the engine.
#[derive(Resource)]
struct SimSettings(SimConfig);

#[derive(Resource)]
struct CameraState {
    target: Vec2,
    zoom: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            target: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

#[derive(Resource)]
struct ViewerConfig {
    ticks_per_second: f32,
    paused: bool,
    accumulator: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: 10.0,
            paused: false,
            accumulator: 0.0,
        }
    }
}

// Marker components for text UI elements
#[derive(Component)]
struct StatusText;

#[derive(Component)]
struct RateText;

/// A per-tick series plotted in its own panel.
struct Series {
    label: &'static str,
    color: Color,
    value: fn(&TickStats) -> f32,
}

const SERIES: [Series; 2] = [
    Series {
        label: "Population",
        color: Color::srgb(0.4, 0.7, 1.0),
        value: |s| s.population as f32,
    },
    Series {
        label: "Mean health",
        color: Color::srgb(1.0, 0.6, 0.2),
        value: |s| s.mean_health,
    },
];

fn setup(mut commands: Commands, sim: Res<SimWrapper>) {
    commands.spawn(Camera2d::default());

    commands.spawn((
        Text2d::new("Tick 0"),
        TextFont {
            font_size: 18.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Transform::from_xyz(-380.0, 360.0, 100.0),
        StatusText,
    ));

    commands.spawn((
        Text2d::new(""),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::srgba(0.8, 0.8, 0.8, 0.9)),
        Transform::from_xyz(-380.0, 338.0, 100.0),
        RateText,
    ));

    let config = sim.0.config();
    for (row, series) in SERIES.iter().enumerate() {
        let origin = chart_origin(row, config.world_width, config.world_height);
        commands.spawn((
            Text2d::new(series.label),
            TextFont {
                font_size: 14.0,
                ..default()
            },
            TextColor(series.color),
            Transform::from_xyz(
                origin.x + CHART_SIZE.x / 2.0,
                origin.y + CHART_SIZE.y + 10.0,
                100.0,
            ),
        ));
    }

    info!(
        "Started {}x{} world with {} agents (seed {})",
        config.world_width,
        config.world_height,
        sim.0.population().len(),
        config.seed
    );
}

fn update_simulation(
    time: Res<Time>,
    keyboard: Res<ButtonInput<KeyCode>>,
    settings: Res<SimSettings>,
    mut viewer: ResMut<ViewerConfig>,
    mut sim: ResMut<SimWrapper>,
) {
    if keyboard.just_pressed(KeyCode::Equal) || keyboard.just_pressed(KeyCode::NumpadAdd) {
        viewer.ticks_per_second = (viewer.ticks_per_second * 2.0).min(240.0);
    }
    if keyboard.just_pressed(KeyCode::Minus) || keyboard.just_pressed(KeyCode::NumpadSubtract) {
        viewer.ticks_per_second = (viewer.ticks_per_second / 2.0).max(0.5);
    }
    if keyboard.just_pressed(KeyCode::Space) {
        viewer.paused = !viewer.paused;
    }
    if keyboard.just_pressed(KeyCode::KeyR) {
        match SimulationEngine::new(settings.0.clone()) {
            Ok(engine) => {
                sim.0 = engine;
                viewer.accumulator = 0.0;
                info!("Restarted simulation");
            }
            Err(e) => error!("Failed to restart: {}", e),
        }
    }

    if viewer.paused || sim.0.is_finished() {
        return;
    }

    viewer.accumulator += time.delta_secs();
    let step = 1.0 / viewer.ticks_per_second;
    while viewer.accumulator >= step && !sim.0.is_finished() {
        viewer.accumulator -= step;
        let stats = sim.0.tick();
        if sim.0.is_extinct() {
            warn!("Population extinct at tick {}", stats.tick);
        }
    }
}

fn camera_controls(
    time: Res<Time>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut scroll_events: EventReader<MouseWheel>,
    mut camera_state: ResMut<CameraState>,
    mut camera_query: Query<&mut Transform, With<Camera2d>>,
) {
    let pan_speed = 400.0 * camera_state.zoom;
    camera_state.target += pan_direction(&keyboard) * pan_speed * time.delta_secs();

    for scroll in scroll_events.read() {
        camera_state.zoom = (camera_state.zoom * (1.0 - scroll.y * 0.1)).clamp(0.1, 10.0);
    }

    if let Ok(mut transform) = camera_query.get_single_mut() {
        transform.translation.x = camera_state.target.x;
        transform.translation.y = camera_state.target.y;
        transform.scale = Vec3::splat(camera_state.zoom);
    }
}

/// Unit pan direction for the held WASD/arrow keys, zero when none or opposing.
fn pan_direction(keyboard: &ButtonInput<KeyCode>) -> Vec2 {
    let held = |a: KeyCode, b: KeyCode| keyboard.pressed(a) || keyboard.pressed(b);
    let mut dir = Vec2::ZERO;
    if held(KeyCode::KeyW, KeyCode::ArrowUp) {
        dir.y += 1.0;
    }
    if held(KeyCode::KeyS, KeyCode::ArrowDown) {
        dir.y -= 1.0;
    }
    if held(KeyCode::KeyA, KeyCode::ArrowLeft) {
        dir.x -= 1.0;
    }
    if held(KeyCode::KeyD, KeyCode::ArrowRight) {
        dir.x += 1.0;
    }
    dir.normalize_or_zero()
}

/// Centre of grid cell (x, y) in world space, grid centred on the origin.
fn cell_center(x: i32, y: i32, width: u32, height: u32) -> Vec2 {
    Vec2::new(
        (x as f32 + 0.5 - width as f32 / 2.0) * CELL,
        (y as f32 + 0.5 - height as f32 / 2.0) * CELL,
    )
}

fn render_grid(sim: Res<SimWrapper>, mut gizmos: Gizmos) {
    let grid = sim.0.grid();
    let (width, height) = (grid.width(), grid.height());

    // Border
    gizmos.rect_2d(
        Isometry2d::from_translation(Vec2::ZERO),
        Vec2::new(width as f32 * CELL, height as f32 * CELL),
        Color::srgba(0.3, 0.3, 0.4, 0.8),
    );

    let food_color = Color::srgba(0.45, 0.75, 0.25, 0.7);
    for (i, &food) in grid.cells().iter().enumerate() {
        if food == 0 {
            continue;
        }
        let x = (i % width as usize) as i32;
        let y = (i / width as usize) as i32;
        gizmos.rect_2d(
            Isometry2d::from_translation(cell_center(x, y, width, height)),
            Vec2::splat(CELL * 0.5),
            food_color,
        );
    }
}

fn render_agents(sim: Res<SimWrapper>, mut gizmos: Gizmos) {
    let grid = sim.0.grid();
    let (width, height) = (grid.width(), grid.height());

    for agent in sim.0.population().iter() {
        gizmos.circle_2d(
            Isometry2d::from_translation(cell_center(agent.x, agent.y, width, height)),
            CELL * 0.3,
            health_color(agent.health),
        );
    }
}

/// Bottom-left corner of history panel `row`, stacked downward from the
/// grid's top-right corner.
fn chart_origin(row: usize, width: u32, height: u32) -> Vec2 {
    let left = width as f32 * CELL / 2.0 + CHART_GAP;
    let top = height as f32 * CELL / 2.0;
    Vec2::new(left, top - (row + 1) as f32 * (CHART_SIZE.y + CHART_GAP))
}

/// Lay `values` out across a panel anchored at `origin`, one point per tick,
/// scaled so the series maximum touches the top edge.
fn chart_points(values: &[f32], origin: Vec2, size: Vec2) -> Vec<Vec2> {
    let max = values.iter().copied().fold(0.0_f32, f32::max);
    let x_step = if values.len() > 1 {
        size.x / (values.len() - 1) as f32
    } else {
        0.0
    };
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| {
            let y = if max > 0.0 { v / max * size.y } else { 0.0 };
            origin + Vec2::new(i as f32 * x_step, y)
        })
        .collect()
}

fn render_history(sim: Res<SimWrapper>, mut gizmos: Gizmos) {
    let grid = sim.0.grid();
    let history = sim.0.history();
    let frame_color = Color::srgba(0.3, 0.3, 0.4, 0.8);

    for (row, series) in SERIES.iter().enumerate() {
        let origin = chart_origin(row, grid.width(), grid.height());
        gizmos.rect_2d(
            Isometry2d::from_translation(origin + CHART_SIZE / 2.0),
            CHART_SIZE,
            frame_color,
        );
        if history.len() < 2 {
            continue;
        }
        let values: Vec<f32> = history.iter().map(series.value).collect();
        gizmos.linestrip_2d(chart_points(&values, origin, CHART_SIZE), series.color);
    }
}

/// Red when starving, green when healthy.
fn health_color(health: f32) -> Color {
    let norm = (health / FULL_HEALTH_COLOR).clamp(0.0, 1.0);
    Color::srgb(1.0 - norm, norm, 0.31)
}

fn update_text_ui(
    sim: Res<SimWrapper>,
    viewer: Res<ViewerConfig>,
    camera_state: Res<CameraState>,
    mut status_query: Query<(&mut Text2d, &mut Transform), (With<StatusText>, Without<RateText>)>,
    mut rate_query: Query<(&mut Text2d, &mut Transform), (With<RateText>, Without<StatusText>)>,
) {
    let pop = sim.0.population();
    let state = if sim.0.is_extinct() {
        " - extinct"
    } else if sim.0.is_finished() {
        " - finished"
    } else if viewer.paused {
        " - paused"
    } else {
        ""
    };

    for (mut text, mut transform) in &mut status_query {
        **text = format!(
            "Tick {}  Population {}  Mean health {:.2}  Food {}{}",
            sim.0.tick_count(),
            pop.len(),
            pop.mean_health(),
            sim.0.grid().food_count(),
            state
        );
        transform.translation.x = camera_state.target.x - 120.0 * camera_state.zoom;
        transform.translation.y = camera_state.target.y + 360.0 * camera_state.zoom;
        transform.scale = Vec3::splat(camera_state.zoom);
    }

    for (mut text, mut transform) in &mut rate_query {
        **text = format!(
            "{:.1} ticks/s  Mean altruism {:.3}",
            viewer.ticks_per_second,
            pop.mean_altruism()
        );
        transform.translation.x = camera_state.target.x - 120.0 * camera_state.zoom;
        transform.translation.y = camera_state.target.y + 338.0 * camera_state.zoom;
        transform.scale = Vec3::splat(camera_state.zoom);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_center_is_symmetric() {
        let a = cell_center(0, 0, 4, 4);
        let b = cell_center(3, 3, 4, 4);
        assert_eq!(a, -b);
        assert_eq!(a, Vec2::new(-15.0, -15.0));
    }

    #[test]
    fn test_chart_points_span_the_panel() {
        let origin = Vec2::new(100.0, -50.0);
        let size = Vec2::new(40.0, 20.0);
        let points = chart_points(&[2.0, 4.0, 1.0], origin, size);
        assert_eq!(
            points,
            vec![
                Vec2::new(100.0, -40.0),
                Vec2::new(120.0, -30.0),
                Vec2::new(140.0, -45.0),
            ]
        );
    }

    #[test]
    fn test_chart_points_flat_at_zero() {
        let points = chart_points(&[0.0, 0.0], Vec2::ZERO, CHART_SIZE);
        assert!(points.iter().all(|p| p.y == 0.0));
        assert!(chart_points(&[], Vec2::ZERO, CHART_SIZE).is_empty());
    }

    #[test]
    fn test_charts_sit_right_of_grid() {
        let first = chart_origin(0, 4, 4);
        let second = chart_origin(1, 4, 4);
        assert_eq!(first.x, 20.0 + CHART_GAP);
        assert!(first.x > cell_center(3, 0, 4, 4).x);
        assert_eq!(first.y + CHART_SIZE.y, 20.0 - CHART_GAP);
        assert_eq!(first.y - second.y, CHART_SIZE.y + CHART_GAP);
    }

    #[test]
    fn test_series_read_history() {
        let mut engine = SimulationEngine::new(SimConfig {
            world_width: 8,
            world_height: 8,
            initial_agents: 5,
            max_ticks: 3,
            ..Default::default()
        })
        .unwrap();
        let stats = engine.tick();
        assert_eq!((SERIES[0].value)(&stats), stats.population as f32);
        assert_eq!((SERIES[1].value)(&stats), stats.mean_health);
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn test_pan_direction() {
        let mut keys = ButtonInput::<KeyCode>::default();
        assert_eq!(pan_direction(&keys), Vec2::ZERO);

        keys.press(KeyCode::KeyW);
        assert_eq!(pan_direction(&keys), Vec2::Y);

        keys.press(KeyCode::ArrowDown);
        assert_eq!(pan_direction(&keys), Vec2::ZERO);

        keys.press(KeyCode::KeyD);
        assert_eq!(pan_direction(&keys), Vec2::X);

        keys.release(KeyCode::ArrowDown);
        let diag = pan_direction(&keys);
        assert!((diag.length() - 1.0).abs() < 1e-6);
        assert!(diag.x > 0.0 && diag.y > 0.0);
    }

    #[test]
    fn test_health_color_clamps() {
        assert_eq!(health_color(-5.0), Color::srgb(1.0, 0.0, 0.31));
        assert_eq!(health_color(100.0), Color::srgb(0.0, 1.0, 0.31));
    }
}
