use anyhow::{Context, Result};
use std::io::ErrorKind;
use std::net::{SocketAddr, UdpSocket};
use std::ops::Deref;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use crate::body::BodyFrame;
use crate::protocol;

/// ソケットの受信タイムアウト（シャットダウンフラグの確認間隔を兼ねる）
const RECV_TIMEOUT: Duration = Duration::from_millis(200);

/// フレーム取得ライフサイクルの状態
///
/// Uninitialized → SensorOpen → FrameSourceWired → Receiving → Closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorState {
    /// open 前（構築前の概念上の状態）
    Uninitialized,
    /// ソケットはバインド済み、データグラム未受信
    SensorOpen,
    /// データグラム受信あり（デバイス利用可能）、ただし現在フレームなし/停止中
    FrameSourceWired,
    /// フレームを受信・解析できている
    Receiving,
    /// close 済み
    Closed,
}

/// 別スレッドで OSC ボディフレームを受信し、最新フレームを提供する
///
/// 受信スレッドがソケットを読み、解析済みフレームを保持する。メインループは
/// frame_id() のポーリングで新フレームを検出し acquire_frame() で取得する。
/// データグラムが availability_timeout の間届かないと利用不可へ降格する
/// （受信が再開すれば自動で復帰する）。
pub struct BodyReceiver {
    local_addr: SocketAddr,
    latest: Arc<Mutex<Option<BodyFrame>>>,
    frame_id: Arc<AtomicU64>,
    available: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
    closed: bool,
}

impl BodyReceiver {
    /// ソケットをバインドして受信スレッドを開始する
    ///
    /// バインド失敗（= センサーソースなし）は致命的エラーとして呼び出し元へ返す。
    pub fn open(listen_addr: &str, availability_timeout: Duration) -> Result<Self> {
        let socket = UdpSocket::bind(listen_addr)
            .with_context(|| format!("Failed to bind sensor socket: {}", listen_addr))?;
        socket.set_read_timeout(Some(RECV_TIMEOUT))?;
        let local_addr = socket.local_addr()?;

        let latest = Arc::new(Mutex::new(None::<BodyFrame>));
        let frame_id = Arc::new(AtomicU64::new(0));
        let available = Arc::new(AtomicBool::new(false));
        let shutdown = Arc::new(AtomicBool::new(false));

        let latest_ref = latest.clone();
        let frame_id_ref = frame_id.clone();
        let available_ref = available.clone();
        let shutdown_ref = shutdown.clone();

        let handle = thread::spawn(move || {
            let mut buf = [0u8; 65536];
            let mut last_packet: Option<Instant> = None;
            loop {
                if shutdown_ref.load(Ordering::Acquire) {
                    break;
                }
                match socket.recv_from(&mut buf) {
                    Ok((len, _src)) => {
                        last_packet = Some(Instant::now());
                        available_ref.store(true, Ordering::Release);
                        // 解析できないデータグラムは読み捨てる
                        if let Ok((_, packet)) = rosc::decoder::decode_udp(&buf[..len]) {
                            if let Ok(frame) = protocol::parse_frame_packet(&packet) {
                                *latest_ref.lock().unwrap() = Some(frame);
                                frame_id_ref.fetch_add(1, Ordering::Release);
                            }
                        }
                    }
                    Err(e)
                        if e.kind() == ErrorKind::WouldBlock || e.kind() == ErrorKind::TimedOut =>
                    {
                        if let Some(t) = last_packet {
                            if t.elapsed() > availability_timeout {
                                available_ref.store(false, Ordering::Release);
                            }
                        }
                    }
                    Err(_) => {}
                }
            }
        });

        Ok(Self {
            local_addr,
            latest,
            frame_id,
            available,
            shutdown,
            handle: Some(handle),
            closed: false,
        })
    }

    /// バインドされたアドレス（ポート0指定時の実ポート確認用）
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// 現在のフレームIDを取得。新フレームが到着するたびにインクリメントされる。
    pub fn frame_id(&self) -> u64 {
        self.frame_id.load(Ordering::Acquire)
    }

    /// センサーソースが現在利用可能か
    pub fn is_available(&self) -> bool {
        self.available.load(Ordering::Acquire)
    }

    /// 現在のライフサイクル状態
    pub fn state(&self) -> SensorState {
        if self.closed {
            return SensorState::Closed;
        }
        let available = self.is_available();
        let received = self.frame_id() > 0;
        match (available, received) {
            (true, true) => SensorState::Receiving,
            (true, false) => SensorState::FrameSourceWired,
            // 受信後に利用不可へ降格した場合は配線済みのまま待機
            (false, true) => SensorState::FrameSourceWired,
            (false, false) => SensorState::SensorOpen,
        }
    }

    /// 最新フレームをスコープ付きで取得
    ///
    /// 返されたガードの生存中は受信スレッドの書き込みがブロックされ、
    /// ガードのドロップで必ず解放される（早期リターンでも解放漏れなし）。
    /// 初回フレーム到着前は None。
    pub fn acquire_frame(&self) -> Option<FrameGuard<'_>> {
        let guard = self.latest.lock().unwrap();
        if guard.is_some() {
            Some(FrameGuard { guard })
        } else {
            None
        }
    }

    /// 受信スレッドを停止してソケットを解放する。何度呼んでも安全。
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.shutdown.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        self.closed = true;
    }
}

impl Drop for BodyReceiver {
    fn drop(&mut self) {
        self.close();
    }
}

/// 最新フレームへのスコープ付きアクセス
///
/// Deref で BodyFrame として読める。ドロップ時にロックが解放される。
pub struct FrameGuard<'a> {
    guard: MutexGuard<'a, Option<BodyFrame>>,
}

impl Deref for FrameGuard<'_> {
    type Target = BodyFrame;

    fn deref(&self) -> &BodyFrame {
        // acquire_frame が Some を確認してから構築する
        self.guard.as_ref().unwrap()
    }
}
