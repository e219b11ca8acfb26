use anyhow::{Context, Result};
use std::time::{Duration, Instant};

use quatview::config::Config;
use quatview::joint::JointType;
use quatview::pipeline::process_frame;
use quatview::render::{CuboidRenderer, Key};
use quatview::rotation::{RenderState, SharedRenderState};
use quatview::selector::SelectionState;
use quatview::sensor::{BodyReceiver, SensorState};

const CONFIG_PATH: &str = "config.toml";

/// キー → 関節トグルの割り当て（押すと排他的に選択される）
const KEY_BINDINGS: [(Key, JointType); 18] = [
    (Key::Key1, JointType::Neck),
    (Key::Key2, JointType::SpineShoulder),
    (Key::Key3, JointType::SpineMid),
    (Key::Key4, JointType::SpineBase),
    (Key::Q, JointType::ShoulderRight),
    (Key::W, JointType::ElbowRight),
    (Key::E, JointType::WristRight),
    (Key::R, JointType::HandRight),
    (Key::A, JointType::ShoulderLeft),
    (Key::S, JointType::ElbowLeft),
    (Key::D, JointType::WristLeft),
    (Key::F, JointType::HandLeft),
    (Key::Z, JointType::HipRight),
    (Key::X, JointType::KneeRight),
    (Key::C, JointType::AnkleRight),
    (Key::V, JointType::HipLeft),
    (Key::B, JointType::KneeLeft),
    (Key::N, JointType::AnkleLeft),
];

fn joint_for_key(key: Key) -> Option<JointType> {
    KEY_BINDINGS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, joint)| *joint)
}

fn main() -> Result<()> {
    let config = Config::load_or_default(CONFIG_PATH);

    println!("Quaternion Checker ({})", env!("GIT_VERSION"));
    println!("Listen: {}", config.sensor.listen_addr);
    println!("Target FPS: {}", config.app.target_fps);
    println!();
    println!("操作: [1-4] 体幹  [Q/W/E/R] 右腕  [A/S/D/F] 左腕");
    println!("      [Z/X/C] 右脚  [V/B/N] 左脚  [0] 選択解除  [Esc] 終了");
    println!();

    // センサーソースなし・バインド失敗は致命的エラー（リトライなし）
    let mut receiver = BodyReceiver::open(
        &config.sensor.listen_addr,
        Duration::from_secs_f32(config.sensor.availability_timeout_secs),
    )
    .context("Failed to open body frame source")?;
    println!("Frame source ready: {}", receiver.local_addr());

    let mut renderer = CuboidRenderer::new(
        "Quaternion Checker",
        config.view.width,
        config.view.height,
        config.view.scale,
    )?;

    // Head の orientation は常にゼロ ⇔ 初期状態
    let mut selection = SelectionState::new();
    let mut looking = JointType::Head;

    let shared = SharedRenderState::new();
    let mut render_state = RenderState::identity();

    let frame_duration = Duration::from_secs_f64(1.0 / config.app.target_fps as f64);
    let mut last_frame_id: u64 = 0;
    let mut last_state = SensorState::Uninitialized;

    // FPS計測
    let mut loop_count = 0u32;
    let mut frame_count = 0u32;
    let mut fps_timer = Instant::now();

    while renderer.is_open() {
        let loop_start = Instant::now();

        // キー入力 → 選択トグル（排他制御はここ = UI側の責務）
        for key in renderer.pressed_keys() {
            if key == Key::Key0 {
                selection.clear();
                println!("選択解除（直前の関節 {} を維持）", looking.name());
            } else if let Some(joint) = joint_for_key(key) {
                selection.select(joint);
                println!("注目関節: {}", joint.name());
            }
        }

        // センサー状態遷移のログ
        let state = receiver.state();
        if state != last_state {
            match state {
                SensorState::FrameSourceWired if last_state == SensorState::SensorOpen => {
                    println!("Sensor available");
                }
                SensorState::FrameSourceWired if last_state == SensorState::Receiving => {
                    println!("Sensor unavailable: フレーム受信が途絶えました（前回の姿勢を保持）");
                }
                SensorState::Receiving => {
                    println!("Receiving body frames");
                }
                _ => {}
            }
            last_state = state;
        }

        // 新フレームのみ処理（ガードはスコープ終了で必ず解放される）
        let current_frame_id = receiver.frame_id();
        if current_frame_id != last_frame_id {
            if let Some(frame) = receiver.acquire_frame() {
                looking = process_frame(&frame, &selection, looking, &mut render_state);
                frame_count += 1;
            }
            shared.publish(render_state);
            last_frame_id = current_frame_id;
        }

        renderer.clear();
        let snapshot = shared.snapshot();
        renderer.draw_state(&snapshot);
        renderer.update()?;

        // FPS表示（1秒に1回）
        loop_count += 1;
        let elapsed = fps_timer.elapsed().as_secs_f32();
        if elapsed >= 1.0 {
            println!(
                "FPS: {:.1} (frames: {})  joint: {}",
                loop_count as f32 / elapsed,
                frame_count,
                looking.name()
            );
            loop_count = 0;
            frame_count = 0;
            fps_timer = Instant::now();
        }

        // FPS上限制御（spin wait for precision）
        while loop_start.elapsed() < frame_duration {
            std::hint::spin_loop();
        }
    }

    println!("Shutting down...");
    receiver.close();
    Ok(())
}
