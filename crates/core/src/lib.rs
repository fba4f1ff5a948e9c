// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rf-core: records, statuses and frame arithmetic shared by the render farm

pub mod command;
pub mod event;
pub mod frames;
pub mod id;
pub mod job;
pub mod settings;
pub mod status;
pub mod task;
pub mod worker;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use command::{Command, CommandParam, RenderParams, SampleChunk};
pub use event::Event;
pub use frames::{
    frame_path, frame_range_merge, iter_frame_range, FrameChunks, FrameRange, RangeStyle,
    ValidationError,
};
pub use id::{IdGen, SequentialIdGen, ShortId, UuidIdGen};
pub use job::{Job, JobConfig, JobId};
pub use settings::{JobSettingError, JobSettings};
pub use status::{
    aggregate_job_status, check_web_request, resolve_job_status, JobStatus, TaskStatus,
    TransitionRejected, UnknownStatus, CANCELABLE_JOB_STATUSES, REQUEUEABLE_JOB_STATUSES,
    TERMINAL_TASK_STATUSES, WEB_SETTABLE_JOB_STATUSES,
};
pub use task::{Task, TaskId};
pub use worker::{Connection, Worker, WorkerId, WorkerStatus};
