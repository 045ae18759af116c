// Gameplay mode: fly the avatar to the goal before time runs out

use super::menu::SCREEN_SIZE;
use super::pause_menu::PauseMenuMode;
use super::post_mission::PostMissionMenuMode;
use crate::engine::input::{AxisAction, ButtonAction, InputManager};
use crate::engine::mode::{Camera, Mode, ModeContext, Renderer};
use glam::{EulerRot, Quat, Vec2, Vec3};
use log::info;

// Camera placement relative to the avatar, in the avatar's frame
const CAMERA_POS_OFFSET: Vec3 = Vec3::new(0.0, 1.1, -7.0);
const CAMERA_TGT_OFFSET: Vec3 = Vec3::new(0.0, 1.1, 0.0);

/// Thrust acceleration at full deflection, m/s^2
const THRUST_ACCEL: f32 = 8.0;
const RUN_MULTIPLIER: f32 = 2.0;
const JUMP_SPEED: f32 = 6.0;
/// Rotation rate at full deflection, rad/s
const ROTATE_SPEED: f32 = 2.0;
/// Fraction of velocity lost per second
const LINEAR_DAMPING: f32 = 0.15;

pub const GOAL_POS: Vec3 = Vec3::new(0.0, 0.0, 100.0);
pub const GOAL_RADIUS: f32 = 5.0;
/// Seconds allowed to reach the goal
pub const TIME_LIMIT: f32 = 120.0;

/// The player's ship
#[derive(Debug, Clone, PartialEq)]
pub struct Avatar {
    pub pos: Vec3,
    pub vel: Vec3,
    pub orient: Quat,
    jump_held: bool,
}

impl Avatar {
    pub fn new(pos: Vec3) -> Self {
        Self {
            pos,
            vel: Vec3::ZERO,
            orient: Quat::IDENTITY,
            jump_held: false,
        }
    }

    /// Advance one simulation step using the bound actions
    pub fn step(&mut self, input: &InputManager, dt: f32) {
        let thrust = Vec3::new(
            input.axis(AxisAction::TranslateX),
            input.axis(AxisAction::TranslateY),
            input.axis(AxisAction::TranslateZ),
        );
        let mult = if input.held(ButtonAction::Run) {
            RUN_MULTIPLIER
        } else {
            1.0
        };
        self.vel += self.orient * thrust * THRUST_ACCEL * mult * dt;

        // Jump is an impulse along local up, once per press
        let jump = input.held(ButtonAction::Jump);
        if jump && !self.jump_held {
            self.vel += self.orient * Vec3::Y * JUMP_SPEED;
        }
        self.jump_held = jump;

        let rot = Quat::from_euler(
            EulerRot::XYZ,
            input.axis(AxisAction::RotateX) * ROTATE_SPEED * dt,
            input.axis(AxisAction::RotateY) * ROTATE_SPEED * dt,
            input.axis(AxisAction::RotateZ) * ROTATE_SPEED * dt,
        );
        self.orient = (self.orient * rot).normalize();

        self.vel *= (1.0 - LINEAR_DAMPING * dt).max(0.0);
        self.pos += self.vel * dt;
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Point given in the avatar's frame, in world coordinates
    pub fn rel_point_pos(&self, offset: Vec3) -> Vec3 {
        self.pos + self.orient * offset
    }
}

pub struct GameplayMode {
    avatar: Avatar,
    elapsed: f32,
    finished: bool,
}

impl GameplayMode {
    pub fn new() -> Self {
        info!("Starting mission");
        Self {
            avatar: Avatar::new(Vec3::ZERO),
            elapsed: 0.0,
            finished: false,
        }
    }

    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    pub fn time_left(&self) -> f32 {
        (TIME_LIMIT - self.elapsed).max(0.0)
    }

    fn check_mission_end(&mut self, ctx: &mut ModeContext) {
        // A push requested this frame (e.g. the pause menu) goes first
        if self.finished || ctx.has_pending_push() {
            return;
        }
        let won = self.avatar.pos.distance(GOAL_POS) <= GOAL_RADIUS;
        if won || self.elapsed >= TIME_LIMIT {
            info!("Mission over, won: {}", won);
            self.finished = true;
            ctx.next_frame_push_mode(Box::new(PostMissionMenuMode::new(won)));
        }
    }
}

impl Default for GameplayMode {
    fn default() -> Self {
        Self::new()
    }
}

impl Mode for GameplayMode {
    fn name(&self) -> &str {
        "Gameplay"
    }

    fn handle_input(&mut self, ctx: &mut ModeContext) -> bool {
        // Avatar controls are read in step so they don't depend on the frame rate
        if !self.finished
            && ctx
                .input
                .button_channel(ButtonAction::Pause)
                .matches_frame_events()
        {
            ctx.next_frame_push_mode(Box::new(PauseMenuMode::new()));
        }
        true
    }

    fn step(&mut self, ctx: &mut ModeContext) {
        if self.finished {
            return;
        }
        self.avatar.step(ctx.input, ctx.dt);
        self.elapsed += ctx.dt;
        self.check_mission_end(ctx);
    }

    fn camera(&self, _top: bool) -> Option<Camera> {
        Some(Camera::new(
            self.avatar.rel_point_pos(CAMERA_POS_OFFSET),
            self.avatar.rel_point_pos(CAMERA_TGT_OFFSET),
            self.avatar.orient * Vec3::Y,
        ))
    }

    fn draw_3d_far(&mut self, _top: bool, renderer: &mut dyn Renderer) {
        renderer.draw_background();
    }

    fn draw_3d_near(&mut self, _top: bool, renderer: &mut dyn Renderer) {
        renderer.draw_object("goal", GOAL_POS);
        renderer.draw_object("avatar", self.avatar.pos);
    }

    fn draw_2d(&mut self, _top: bool, renderer: &mut dyn Renderer) {
        renderer.draw_text(
            Vec2::new(0.0, SCREEN_SIZE.y - 20.0),
            18.0,
            &format!("Speed: {:.1} m/s", self.avatar.speed()),
        );
        renderer.draw_text(
            Vec2::new(SCREEN_SIZE.x - 140.0, 0.0),
            18.0,
            &format!("Time: {:.0}", self.time_left()),
        );
    }
}
