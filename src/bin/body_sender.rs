//! 合成ボディフレームの送信テストツール
//!
//! センサー実機なしでビューアを動かすためのピア。Y軸まわりにゆっくり回転する
//! orientation を全関節に入れたフレームを送り続ける。

use anyhow::Result;
use std::net::UdpSocket;
use std::time::{Duration, Instant};

use quatview::body::{Body, BodyFrame, Quaternion};
use quatview::joint::JointType;
use quatview::protocol;

const DEFAULT_TARGET: &str = "127.0.0.1:39540";
const SEND_FPS: f64 = 30.0;
/// 1周にかかる秒数
const REVOLUTION_SECS: f32 = 10.0;

fn main() -> Result<()> {
    let target = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_TARGET.to_string());

    println!("Body Sender - 合成フレーム送信");
    println!("送信先: {}", target);
    println!("Ctrl+C で終了");
    println!();

    let socket = UdpSocket::bind("0.0.0.0:0")?;
    let interval = Duration::from_secs_f64(1.0 / SEND_FPS);
    let start = Instant::now();
    let mut sent = 0u64;

    loop {
        let t = start.elapsed().as_secs_f32();
        let yaw = t * std::f32::consts::TAU / REVOLUTION_SECS;
        let half = yaw / 2.0;
        let q = Quaternion::new(half.cos(), 0.0, half.sin(), 0.0);

        let mut orientations = [q; JointType::COUNT];
        // Head の orientation は常にゼロ回転（センサーの挙動に合わせる）
        orientations[JointType::Head as usize] = Quaternion::identity();

        let frame = BodyFrame::new(vec![Body::new(true, orientations)]);
        let data = protocol::encode_frame(&frame)?;
        socket.send_to(&data, &target)?;

        sent += 1;
        if sent % (SEND_FPS as u64 * 5) == 0 {
            println!("sent {} frames (yaw {:.0}°)", sent, yaw.to_degrees() % 360.0);
        }

        std::thread::sleep(interval);
    }
}
