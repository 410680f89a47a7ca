//! 固定并发任务池 - 编排层
//!
//! ## 职责
//!
//! 以固定的并发上限执行一批相互独立的异步任务。
//!
//! ## 核心保证
//!
//! 1. **并发上限**：任意时刻在途任务数不超过 min(并发上限, 任务总数)
//! 2. **不重不漏**：每个任务恰好被尝试一次，无论之前的任务是否失败
//! 3. **失败隔离**：单个任务的失败被捕获为该任务的终态，
//!    不影响其他任务，也不中断批次
//! 4. **进度回调**：每个任务结算后回调恰好触发一次，计数严格递增，
//!    批次结束时计数等于任务总数
//!
//! ## 算法
//!
//! 共享一个待处理队列，启动 min(N, total) 个 worker 循环；
//! 每个 worker 反复从队首取出下一个任务并等待其完成，
//! 直到队列为空才退出。所有 worker 退出后批次结束。
//! 不同任务的完成顺序不保证（先空闲的 worker 先领取），
//! 单个 worker 内的领取是严格串行的。

use anyhow::Result;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::error::AppError;
use crate::models::job::{BatchReport, Job, JobState};

/// 以固定并发上限运行一批任务
///
/// # 参数
/// - `keys`: 任务 key 列表（重复的 key 视为相互独立的任务）
/// - `concurrency`: 并发上限（按至少为 1 处理）
/// - `process`: 单个任务的处理函数，成功时返回结果 URL
/// - `on_progress`: 进度回调，每个任务结算后以 (已完成数, 总数) 调用一次
///
/// # 返回
/// 返回批次报告，任务顺序与输入 key 顺序一致。
/// 任务处理函数的失败不会导致本函数失败；
/// 只有 worker 本身异常退出（panic）才会返回错误。
pub async fn run_pool<P, Fut, C>(
    keys: Vec<String>,
    concurrency: usize,
    process: P,
    on_progress: C,
) -> Result<BatchReport>
where
    P: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String>> + Send + 'static,
    C: Fn(usize, usize) + Send + Sync + 'static,
{
    let total = keys.len();

    // 空批次：不启动任何 worker，立即完成
    if total == 0 {
        return Ok(BatchReport { jobs: Vec::new() });
    }

    // 共享状态：待处理队列、每个任务的状态槽、完成计数
    let queue: Arc<Mutex<VecDeque<(usize, String)>>> =
        Arc::new(Mutex::new(keys.iter().cloned().enumerate().collect()));
    let states = Arc::new(Mutex::new(vec![JobState::Pending; total]));
    let completed = Arc::new(Mutex::new(0usize));
    let process = Arc::new(process);
    let on_progress = Arc::new(on_progress);

    // 任务数少于并发上限时，多余的 worker 不必启动
    let worker_count = concurrency.max(1).min(total);
    let mut handles = Vec::with_capacity(worker_count);

    for worker_id in 0..worker_count {
        let queue = queue.clone();
        let states = states.clone();
        let completed = completed.clone();
        let process = process.clone();
        let on_progress = on_progress.clone();

        handles.push(tokio::spawn(async move {
            loop {
                // 领取下一个任务；队列为空则退出
                let next = queue.lock().await.pop_front();
                let Some((index, key)) = next else {
                    break;
                };
                debug!("worker {} 领取任务: {}", worker_id, key);

                // 单个任务的失败在这里被捕获为终态，不向外传播
                let state = match process(key.clone()).await {
                    Ok(url) => JobState::Done(url),
                    Err(e) => {
                        error!("任务 {} 失败: {}", key, e);
                        JobState::Error(e.to_string())
                    }
                };
                states.lock().await[index] = state;

                // 计数与回调在同一把锁内完成，保证回调计数严格递增
                let mut done = completed.lock().await;
                *done += 1;
                on_progress(*done, total);
            }
        }));
    }

    // 等待所有 worker 退出；worker panic 属于编程错误，直接向上传播
    for joined in futures::future::join_all(handles).await {
        joined.map_err(AppError::worker_panicked)?;
    }

    let final_states = states.lock().await;
    let jobs = keys
        .into_iter()
        .zip(final_states.iter().cloned())
        .map(|(key, state)| Job { key, state })
        .collect();

    Ok(BatchReport { jobs })
}

/// 独立运行单个任务（用于重试失败的 key）
///
/// 与批次运行完全独立：不共享队列，不影响任何批次的
/// 并发与完成计数，只产生一个全新的终态。
pub async fn run_single<P, Fut>(key: String, process: P) -> Job
where
    P: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<String>>,
{
    match process(key.clone()).await {
        Ok(url) => Job {
            key,
            state: JobState::Done(url),
        },
        Err(e) => Job {
            key,
            state: JobState::Error(e.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;
    use tokio::time::sleep;

    /// 在途计数器：记录并发高水位
    struct InFlight {
        current: AtomicUsize,
        high_water: AtomicUsize,
    }

    impl InFlight {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                current: AtomicUsize::new(0),
                high_water: AtomicUsize::new(0),
            })
        }

        fn enter(&self) {
            let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
            self.high_water.fetch_max(now, Ordering::SeqCst);
        }

        fn exit(&self) {
            self.current.fetch_sub(1, Ordering::SeqCst);
        }

        fn high(&self) -> usize {
            self.high_water.load(Ordering::SeqCst)
        }
    }

    /// 构建一个带在途统计的处理函数，`fail_key` 指定的任务会失败
    fn tracked_process(
        in_flight: Arc<InFlight>,
        fail_key: Option<&str>,
    ) -> impl Fn(String) -> futures::future::BoxFuture<'static, Result<String>> + Send + Sync + 'static
    {
        let fail_key = fail_key.map(|s| s.to_string());
        move |key: String| {
            let in_flight = in_flight.clone();
            let fail_key = fail_key.clone();
            Box::pin(async move {
                in_flight.enter();
                sleep(Duration::from_millis(30)).await;
                in_flight.exit();
                if Some(key.as_str()) == fail_key.as_deref() {
                    anyhow::bail!("boom");
                }
                Ok(format!("https://cdn.dsboard.io/gen/{}.png", key))
            })
        }
    }

    /// 收集进度回调计数
    fn progress_collector() -> (
        Arc<StdMutex<Vec<usize>>>,
        impl Fn(usize, usize) + Send + Sync + 'static,
    ) {
        let calls = Arc::new(StdMutex::new(Vec::new()));
        let collector = {
            let calls = calls.clone();
            move |done: usize, _total: usize| calls.lock().unwrap().push(done)
        };
        (calls, collector)
    }

    fn keys(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_all_jobs_reach_terminal_state() {
        let in_flight = InFlight::new();
        let (calls, collector) = progress_collector();

        let report = run_pool(
            keys(&["a", "b", "c", "d", "e"]),
            3,
            tracked_process(in_flight.clone(), Some("c")),
            collector,
        )
        .await
        .unwrap();

        // 全部到达终态，"c" 失败且不影响其他任务
        assert_eq!(report.total(), 5);
        assert!(report.is_complete());
        assert_eq!(report.succeeded(), 4);
        assert_eq!(report.failed(), 1);

        let c = report.jobs.iter().find(|j| j.key == "c").unwrap();
        assert_eq!(c.error(), Some("boom"));
        for job in report.jobs.iter().filter(|j| j.key != "c") {
            assert!(job.is_done());
            assert!(job.result().unwrap().contains(&job.key));
        }

        // 进度回调恰好 5 次且严格递增
        assert_eq!(*calls.lock().unwrap(), vec![1, 2, 3, 4, 5]);

        // 并发高水位不超过上限
        assert!(in_flight.high() <= 3);
    }

    #[tokio::test]
    async fn test_concurrency_never_exceeds_limit() {
        let in_flight = InFlight::new();
        let (_, collector) = progress_collector();

        let report = run_pool(
            keys(&["a", "b", "c", "d", "e", "f"]),
            3,
            tracked_process(in_flight.clone(), None),
            collector,
        )
        .await
        .unwrap();

        assert_eq!(report.succeeded(), 6);
        // 任务数充足时三个 worker 都应进入在途状态，且不会超过 3
        assert_eq!(in_flight.high(), 3);
    }

    #[tokio::test]
    async fn test_excess_workers_exit_immediately() {
        let in_flight = InFlight::new();
        let (calls, collector) = progress_collector();

        let report = run_pool(
            keys(&["a", "b"]),
            10,
            tracked_process(in_flight.clone(), None),
            collector,
        )
        .await
        .unwrap();

        assert_eq!(report.succeeded(), 2);
        assert_eq!(*calls.lock().unwrap(), vec![1, 2]);
        // 在途任务数不超过 min(N, total)
        assert!(in_flight.high() <= 2);
    }

    #[test]
    fn test_empty_batch_completes_immediately() {
        // 空批次同步完成，不需要定时器，也不触发任何回调
        let (calls, collector) = progress_collector();
        let in_flight = InFlight::new();

        let report = tokio_test::block_on(run_pool(
            Vec::new(),
            3,
            tracked_process(in_flight.clone(), None),
            collector,
        ))
        .unwrap();

        assert_eq!(report.total(), 0);
        assert!(report.is_complete());
        assert!(calls.lock().unwrap().is_empty());
        assert_eq!(in_flight.high(), 0);
    }

    #[tokio::test]
    async fn test_failure_does_not_block_siblings() {
        let in_flight = InFlight::new();
        let (calls, collector) = progress_collector();

        let report = run_pool(
            keys(&["a", "boom-key", "c", "d"]),
            2,
            tracked_process(in_flight.clone(), Some("boom-key")),
            collector,
        )
        .await
        .unwrap();

        assert!(report.is_complete());
        assert_eq!(report.failed(), 1);
        assert_eq!(report.succeeded(), 3);
        assert_eq!(calls.lock().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_order_independence() {
        let forward = keys(&["a", "b", "c", "d", "e"]);
        let mut reversed = forward.clone();
        reversed.reverse();

        let mut states = Vec::new();
        for input in [forward, reversed] {
            let in_flight = InFlight::new();
            let (_, collector) = progress_collector();
            let report = run_pool(
                input,
                3,
                tracked_process(in_flight, Some("c")),
                collector,
            )
            .await
            .unwrap();

            let mut outcome: Vec<(String, bool)> = report
                .jobs
                .iter()
                .map(|j| (j.key.clone(), j.is_done()))
                .collect();
            outcome.sort();
            states.push(outcome);
        }

        // 输入顺序不影响终态集合
        assert_eq!(states[0], states[1]);
    }

    #[tokio::test]
    async fn test_duplicate_keys_are_independent_jobs() {
        let in_flight = InFlight::new();
        let (calls, collector) = progress_collector();

        let report = run_pool(
            keys(&["a", "a", "a"]),
            2,
            tracked_process(in_flight, None),
            collector,
        )
        .await
        .unwrap();

        assert_eq!(report.total(), 3);
        assert_eq!(report.succeeded(), 3);
        assert_eq!(*calls.lock().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_retry_single_failed_key() {
        let in_flight = InFlight::new();
        let (_, collector) = progress_collector();

        let report = run_pool(
            keys(&["a", "b", "c"]),
            2,
            tracked_process(in_flight.clone(), Some("b")),
            collector,
        )
        .await
        .unwrap();

        let b = report.jobs.iter().find(|j| j.key == "b").unwrap();
        assert!(b.is_error());

        // 独立重试：产生全新的终态，不触碰原批次
        let retried = run_single("b".to_string(), |key| async move {
            Ok(format!("https://cdn.dsboard.io/gen/retry-{}.png", key))
        })
        .await;

        assert!(retried.is_done());
        assert_eq!(
            retried.result(),
            Some("https://cdn.dsboard.io/gen/retry-b.png")
        );

        // 原批次的兄弟任务终态保持不变
        assert_eq!(report.succeeded(), 2);
        assert!(report.jobs.iter().find(|j| j.key == "b").unwrap().is_error());
    }

    #[tokio::test]
    async fn test_worker_panic_surfaces_as_error() {
        let (_, collector) = progress_collector();

        let process = |_key: String| -> futures::future::BoxFuture<'static, Result<String>> {
            Box::pin(async { panic!("任务处理函数不应 panic") })
        };
        let result = run_pool(keys(&["a"]), 1, process, collector).await;

        // worker panic 是编程错误，必须向调用方传播
        assert!(result.is_err());
    }
}
