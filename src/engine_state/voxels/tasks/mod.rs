//! # Voxel Task System
//!
//! Background tasks of the voxel world. Chunk generation is the only one: it runs
//! the full generation pipeline on a worker and hands the finished chunk back.

pub mod chunk_generation_task;
