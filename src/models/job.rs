//! 生成任务模型
//!
//! 一个任务（Job）对应一张待生成的场景图，以角度 ID 作为 key。
//! 任务由任务池执行，终态只会被写入一次：要么成功（图片 URL），
//! 要么失败（错误信息）。

use serde::Serialize;

/// 任务状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum JobState {
    /// 等待处理
    Pending,
    /// 生成成功，保存图片 URL
    Done(String),
    /// 生成失败，保存错误信息
    Error(String),
}

impl JobState {
    /// 是否已到达终态
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobState::Pending)
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobState::Pending => write!(f, "等待中"),
            JobState::Done(url) => write!(f, "成功: {}", url),
            JobState::Error(msg) => write!(f, "失败: {}", msg),
        }
    }
}

/// 单个生成任务
///
/// key 标识一个角度；同一批次中重复的 key 视为相互独立的任务。
#[derive(Debug, Clone, Serialize)]
pub struct Job {
    pub key: String,
    pub state: JobState,
}

impl Job {
    /// 创建一个等待处理的任务
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            state: JobState::Pending,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state, JobState::Done(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self.state, JobState::Error(_))
    }

    /// 成功时返回图片 URL
    pub fn result(&self) -> Option<&str> {
        match &self.state {
            JobState::Done(url) => Some(url),
            _ => None,
        }
    }

    /// 失败时返回错误信息
    pub fn error(&self) -> Option<&str> {
        match &self.state {
            JobState::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

/// 一次批量运行的结果报告
///
/// 任务顺序与提交时的 key 顺序一致。
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub jobs: Vec<Job>,
}

impl BatchReport {
    /// 批次中的任务总数
    pub fn total(&self) -> usize {
        self.jobs.len()
    }

    /// 已到达终态的任务数
    pub fn completed_count(&self) -> usize {
        self.jobs.iter().filter(|j| j.state.is_terminal()).count()
    }

    /// 成功的任务数
    pub fn succeeded(&self) -> usize {
        self.jobs.iter().filter(|j| j.is_done()).count()
    }

    /// 失败的任务数
    pub fn failed(&self) -> usize {
        self.jobs.iter().filter(|j| j.is_error()).count()
    }

    /// 失败的任务列表
    pub fn failed_jobs(&self) -> Vec<&Job> {
        self.jobs.iter().filter(|j| j.is_error()).collect()
    }

    /// 批次是否已全部结算
    pub fn is_complete(&self) -> bool {
        self.completed_count() == self.total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_terminal_states() {
        let mut job = Job::new("front-studio");
        assert!(!job.state.is_terminal());
        assert_eq!(job.result(), None);

        job.state = JobState::Done("https://img.example.com/1.png".to_string());
        assert!(job.is_done());
        assert_eq!(job.result(), Some("https://img.example.com/1.png"));

        job.state = JobState::Error("boom".to_string());
        assert!(job.is_error());
        assert_eq!(job.error(), Some("boom"));
    }

    #[test]
    fn test_batch_report_counts() {
        let report = BatchReport {
            jobs: vec![
                Job {
                    key: "a".to_string(),
                    state: JobState::Done("u1".to_string()),
                },
                Job {
                    key: "b".to_string(),
                    state: JobState::Error("boom".to_string()),
                },
                Job {
                    key: "c".to_string(),
                    state: JobState::Done("u2".to_string()),
                },
            ],
        };

        assert_eq!(report.total(), 3);
        assert_eq!(report.completed_count(), 3);
        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.failed_jobs()[0].key, "b");
        assert!(report.is_complete());
    }
}
