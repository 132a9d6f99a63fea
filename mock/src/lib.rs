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

//! Expectation-queue [`Fetcher`] for tests.
//!
//! Every fetch pops the oldest expectation and fails unless it names
//! the same URI. A fetch with nothing left to expect fails too, so a
//! test asserts "no second fetch" simply by not expecting one.

pub mod expect;

#[doc(inline)]
pub use expect::Expect;
pub use expect::ExpectedRequest;

use redfish_validator_core::Fetched;
use redfish_validator_core::Fetcher;
use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::sync::Mutex;
use std::sync::PoisonError;

#[derive(Debug)]
pub enum Error {
    ErrorResponse(Box<dyn StdError + Send + Sync>),
    MutexLock(String),
    NothingIsExpected(String),
    UnexpectedFetch(String, ExpectedRequest),
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::ErrorResponse(err) => write!(f, "response: {err}"),
            Self::MutexLock(err) => write!(f, "lock error: {err}"),
            Self::NothingIsExpected(uri) => {
                write!(f, "nothing is expected to happen but {uri} is fetched")
            }
            Self::UnexpectedFetch(uri, expected) => {
                write!(f, "unexpected fetch: {uri}; expected: {expected:?}")
            }
        }
    }
}

impl StdError for Error {}

impl Error {
    pub fn mutex_lock<T>(err: PoisonError<T>) -> Self {
        Self::MutexLock(err.to_string())
    }
}

/// Service under test replaced by a queue of expectations.
pub struct Service<E> {
    expect: Mutex<VecDeque<Expect<E>>>,
}

impl<E> Default for Service<E> {
    fn default() -> Self {
        Self {
            expect: Mutex::new(VecDeque::new()),
        }
    }
}

impl<E> Service<E> {
    /// Append expectation. Expectations are consumed in the order
    /// they are added.
    pub fn expect(&self, exp: Expect<E>) {
        self.expect.lock().expect("not poisoned").push_back(exp);
    }

    /// Number of expectations not consumed yet.
    pub fn remaining(&self) -> usize {
        self.expect.lock().expect("not poisoned").len()
    }

    pub fn debug_expect(&self) {
        let expect: &VecDeque<Expect<E>> = &self.expect.lock().expect("not poisoned");
        println!("Expectations (total: {})", expect.len());
        for v in expect {
            println!("{:#?}", v.request);
        }
    }
}

impl<E> Fetcher for Service<E>
where
    E: StdError + Send + Sync + 'static,
{
    type Error = Error;

    async fn fetch(&self, in_uri: &str) -> Result<Fetched, Error> {
        let expect = self
            .expect
            .lock()
            .map_err(Error::mutex_lock)?
            .pop_front()
            .ok_or_else(|| Error::NothingIsExpected(in_uri.into()))?;
        match expect {
            Expect {
                request: ExpectedRequest::Fetch { uri },
                response,
            } if uri == in_uri => response.map_err(|err| Error::ErrorResponse(Box::new(err))),
            _ => Err(Error::UnexpectedFetch(in_uri.into(), expect.request)),
        }
    }
}
