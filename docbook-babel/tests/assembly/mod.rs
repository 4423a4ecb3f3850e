//! Multi-document builds and assemblies

mod build;
mod concurrency;
