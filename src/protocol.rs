//! ボディフレームの OSC ワイヤフォーマット
//!
//! センサーランタイム → ビューアの UDP 転送。
//! ボディ1体 = OscMessage 1通（/kinect/body）、1フレーム = OscBundle 1個。
//!
//! メッセージ引数: index(Int), tracked(Int 0/1),
//! 以降は関節インデックス順に w, x, y, z (Float) が19関節分。

use anyhow::{bail, Result};
use rosc::{OscBundle, OscMessage, OscPacket, OscTime, OscType};

use crate::body::{Body, BodyFrame, Quaternion};
use crate::joint::JointType;

/// ボディメッセージのアドレス
pub const OSC_BODY_ADDR: &str = "/kinect/body";

/// センサーが同時に扱う最大ボディ数（Kinect V2: 6）
pub const MAX_BODY_COUNT: usize = 6;

/// ボディ1体分の引数数: index + tracked + 19関節 × (w,x,y,z)
pub const BODY_ARG_COUNT: usize = 2 + JointType::COUNT * 4;

/// ボディ1体分の OSC メッセージを構築
pub fn build_body_message(index: i32, body: &Body) -> OscMessage {
    let mut args = Vec::with_capacity(BODY_ARG_COUNT);
    args.push(OscType::Int(index));
    args.push(OscType::Int(if body.tracked { 1 } else { 0 }));
    for q in body.orientations.iter() {
        args.push(OscType::Float(q.w));
        args.push(OscType::Float(q.x));
        args.push(OscType::Float(q.y));
        args.push(OscType::Float(q.z));
    }
    OscMessage {
        addr: OSC_BODY_ADDR.to_string(),
        args,
    }
}

/// 1フレーム分の OSC バンドルを構築
pub fn build_frame_packet(frame: &BodyFrame) -> OscPacket {
    let content = frame
        .bodies
        .iter()
        .enumerate()
        .map(|(i, body)| OscPacket::Message(build_body_message(i as i32, body)))
        .collect();
    OscPacket::Bundle(OscBundle {
        // immediately (タイムタグ 0x1)
        timetag: OscTime {
            seconds: 0,
            fractional: 1,
        },
        content,
    })
}

/// フレームをバイト列にエンコード
pub fn encode_frame(frame: &BodyFrame) -> Result<Vec<u8>> {
    let packet = build_frame_packet(frame);
    let encoded = rosc::encoder::encode(&packet)?;
    Ok(encoded)
}

fn float_arg(args: &[OscType], i: usize) -> Result<f32> {
    match args.get(i) {
        Some(OscType::Float(v)) => Ok(*v),
        other => bail!("arg {} is not a float: {:?}", i, other),
    }
}

fn int_arg(args: &[OscType], i: usize) -> Result<i32> {
    match args.get(i) {
        Some(OscType::Int(v)) => Ok(*v),
        other => bail!("arg {} is not an int: {:?}", i, other),
    }
}

/// ボディメッセージを解析し (index, Body) を返す
pub fn parse_body_message(msg: &OscMessage) -> Result<(usize, Body)> {
    if msg.addr != OSC_BODY_ADDR {
        bail!("unexpected address: {}", msg.addr);
    }
    if msg.args.len() != BODY_ARG_COUNT {
        bail!(
            "body message has {} args, expected {}",
            msg.args.len(),
            BODY_ARG_COUNT
        );
    }

    let index = int_arg(&msg.args, 0)?;
    if index < 0 || index as usize >= MAX_BODY_COUNT {
        bail!("body index out of range: {}", index);
    }
    let tracked = int_arg(&msg.args, 1)? != 0;

    let mut orientations = [Quaternion::identity(); JointType::COUNT];
    for (j, q) in orientations.iter_mut().enumerate() {
        let base = 2 + j * 4;
        *q = Quaternion::new(
            float_arg(&msg.args, base)?,
            float_arg(&msg.args, base + 1)?,
            float_arg(&msg.args, base + 2)?,
            float_arg(&msg.args, base + 3)?,
        );
    }

    Ok((index as usize, Body::new(tracked, orientations)))
}

/// OSC パケットをボディフレームに解析する
///
/// バンドル内のボディメッセージを index 順に並べて返す。
/// 単独メッセージ（1ボディのみのフレーム）も受け付ける。
pub fn parse_frame_packet(packet: &OscPacket) -> Result<BodyFrame> {
    let mut bodies: Vec<(usize, Body)> = Vec::new();
    match packet {
        OscPacket::Bundle(bundle) => {
            for item in bundle.content.iter() {
                match item {
                    OscPacket::Message(msg) => bodies.push(parse_body_message(msg)?),
                    OscPacket::Bundle(_) => bail!("nested bundle is not supported"),
                }
            }
        }
        OscPacket::Message(msg) => bodies.push(parse_body_message(msg)?),
    }
    bodies.sort_by_key(|(index, _)| *index);
    Ok(BodyFrame::new(bodies.into_iter().map(|(_, b)| b).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracked_body(q: Quaternion) -> Body {
        Body::new(true, [q; JointType::COUNT])
    }

    #[test]
    fn test_body_message_address_and_arg_count() {
        let msg = build_body_message(0, &Body::untracked());
        assert_eq!(msg.addr, "/kinect/body");
        assert_eq!(msg.args.len(), 2 + 19 * 4);
    }

    #[test]
    fn test_body_message_layout() {
        let mut body = Body::untracked();
        body.tracked = true;
        body.orientations[JointType::Head as usize] = Quaternion::new(0.5, -0.5, 0.25, 1.0);
        let msg = build_body_message(3, &body);

        assert_eq!(msg.args[0], OscType::Int(3));
        assert_eq!(msg.args[1], OscType::Int(1));
        // Head は関節インデックス0 → 先頭の4フロート
        assert_eq!(msg.args[2], OscType::Float(0.5));
        assert_eq!(msg.args[3], OscType::Float(-0.5));
        assert_eq!(msg.args[4], OscType::Float(0.25));
        assert_eq!(msg.args[5], OscType::Float(1.0));
    }

    #[test]
    fn test_body_message_roundtrip() {
        let body = tracked_body(Quaternion::new(0.7071, 0.7071, 0.0, 0.0));
        let msg = build_body_message(2, &body);
        let (index, parsed) = parse_body_message(&msg).unwrap();
        assert_eq!(index, 2);
        assert_eq!(parsed, body);
    }

    #[test]
    fn test_frame_encode_decode_roundtrip() {
        let frame = BodyFrame::new(vec![
            tracked_body(Quaternion::new(1.0, 0.0, 0.0, 0.0)),
            Body::untracked(),
        ]);
        let encoded = encode_frame(&frame).unwrap();
        let (_, packet) = rosc::decoder::decode_udp(&encoded).unwrap();
        let parsed = parse_frame_packet(&packet).unwrap();
        assert_eq!(parsed, frame);
    }

    #[test]
    fn test_parse_rejects_wrong_address() {
        let mut msg = build_body_message(0, &Body::untracked());
        msg.addr = "/other".to_string();
        assert!(parse_body_message(&msg).is_err());
    }

    #[test]
    fn test_parse_rejects_truncated_args() {
        let mut msg = build_body_message(0, &Body::untracked());
        msg.args.pop();
        assert!(parse_body_message(&msg).is_err());
    }

    #[test]
    fn test_parse_rejects_bad_index() {
        let mut msg = build_body_message(0, &Body::untracked());
        msg.args[0] = OscType::Int(MAX_BODY_COUNT as i32);
        assert!(parse_body_message(&msg).is_err());
        msg.args[0] = OscType::Int(-1);
        assert!(parse_body_message(&msg).is_err());
    }

    #[test]
    fn test_parse_single_message_as_frame() {
        let body = tracked_body(Quaternion::identity());
        let packet = OscPacket::Message(build_body_message(0, &body));
        let frame = parse_frame_packet(&packet).unwrap();
        assert_eq!(frame.bodies.len(), 1);
        assert!(frame.bodies[0].tracked);
    }

    #[test]
    fn test_parse_orders_bodies_by_index() {
        let a = tracked_body(Quaternion::new(1.0, 0.0, 0.0, 0.0));
        let b = tracked_body(Quaternion::new(0.0, 1.0, 0.0, 0.0));
        let packet = OscPacket::Bundle(OscBundle {
            timetag: OscTime {
                seconds: 0,
                fractional: 1,
            },
            content: vec![
                OscPacket::Message(build_body_message(1, &b)),
                OscPacket::Message(build_body_message(0, &a)),
            ],
        });
        let frame = parse_frame_packet(&packet).unwrap();
        assert_eq!(frame.bodies[0], a);
        assert_eq!(frame.bodies[1], b);
    }
}
