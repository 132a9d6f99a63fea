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

use crate::edmx::Annotation;
use crate::edmx::SimpleIdentifier;
use serde::Deserialize;

/// 10.1 Element edm:EnumType
#[derive(Debug, Deserialize)]
pub struct EnumType {
    #[serde(rename = "@Name")]
    pub name: SimpleIdentifier,
    #[serde(rename = "Member", default)]
    pub members: Vec<EnumMember>,
    #[serde(rename = "Annotation", default)]
    pub annotations: Vec<Annotation>,
}

/// 10.2 Element edm:Member
#[derive(Clone, Debug, Deserialize)]
pub struct EnumMember {
    #[serde(rename = "@Name")]
    pub name: SimpleIdentifier,
}

impl EnumType {
    /// Member names in declaration order.
    #[must_use]
    pub fn member_names(&self) -> Vec<String> {
        self.members.iter().map(|m| m.name.inner().clone()).collect()
    }
}
