// Pipeline orchestration: the end-to-end model run.

pub mod vonmon;
