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
use crate::edmx::PropertyName;
use crate::edmx::TypeRef;
use serde::Deserialize;

/// 6.1 Element edm:Property and 7.1 Element edm:NavigationProperty.
///
/// Both elements carry the attributes the resolver reads under the
/// same names, so one shape deserializes either of them. The owning
/// type sets `is_navigation` from the element it came from.
#[derive(Clone, Debug, Deserialize)]
pub struct Property {
    #[serde(rename = "@Name")]
    pub name: PropertyName,
    #[serde(rename = "@Type")]
    pub ptype: TypeRef,
    #[serde(rename = "@Nullable")]
    pub nullable: Option<bool>,
    #[serde(rename = "Annotation", default)]
    pub annotations: Vec<Annotation>,
    #[serde(skip)]
    pub is_navigation: bool,
}
