//! 종료 신호 처리.
//!
//! OS 시그널을 기다렸다가 watch 채널로 웹 서버에 graceful shutdown을 알린다.

use std::future::Future;
use tokio::sync::watch;
use tracing::{info, warn};

/// SIGINT/SIGTERM (비유닉스는 Ctrl+C) 수신까지 대기
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        if let (Ok(mut sigint), Ok(mut sigterm)) = (
            signal(SignalKind::interrupt()),
            signal(SignalKind::terminate()),
        ) {
            tokio::select! {
                _ = sigint.recv() => info!("SIGINT 수신"),
                _ = sigterm.recv() => info!("SIGTERM 수신"),
            }
            return;
        }
        warn!("유닉스 시그널 핸들러 등록 실패, Ctrl+C만 대기");
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        // 시그널 없이는 외부 종료(kill)만 가능
        warn!("Ctrl+C 핸들러 등록 실패: {e}");
        std::future::pending::<()>().await;
    }
    info!("Ctrl+C 수신");
}

/// `signal`이 끝나면 구독자 전체에 종료를 알림
pub async fn notify_on<F>(signal: F, tx: &watch::Sender<bool>)
where
    F: Future<Output = ()>,
{
    signal.await;
    info!("종료 신호 발송");
    let _ = tx.send(true);
}
