//! DNS Provider implementations

/// Shared utilities used by provider implementations.
pub mod common;

#[cfg(feature = "aliyun")]
mod aliyun;
#[cfg(feature = "tencent")]
mod tencent;

#[cfg(feature = "aliyun")]
pub use aliyun::{AliyunProvider, AliyunProviderBuilder, AliyunRoleAssumer};
#[cfg(feature = "tencent")]
pub use tencent::{TencentProvider, TencentProviderBuilder, TencentRoleAssumer};
