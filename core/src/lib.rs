// SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Core types shared by the Redfish service validator crates.
//!
//! - [`ODataId`]: `@odata.id` of Redfish resources.
//! - [`Fetcher`]: the network-fetch collaborator contract used to
//!   retrieve both live resources and remote schema documents.
//! - [`Counters`]: the pass/fail/skip/... vocabulary aggregated over a
//!   crawl.

pub mod counters;
pub mod fetch;
pub mod odata;

#[doc(inline)]
pub use counters::Counter;
#[doc(inline)]
pub use counters::Counters;
#[doc(inline)]
pub use fetch::Body;
#[doc(inline)]
pub use fetch::Fetched;
#[doc(inline)]
pub use fetch::Fetcher;
#[doc(inline)]
pub use odata::ODataId;

use std::future::Future;
use std::pin::Pin;

/// Boxed `Send` future. Used where async code recurses.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
