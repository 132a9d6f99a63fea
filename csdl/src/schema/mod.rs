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

/// Parsed schema document with its reference index.
pub mod document;

/// 4.2 Reference index over `edmx:Reference` declarations.
pub mod references;

/// Memoized loading of schema documents.
pub mod cache;

/// Type lookup and base-type chains.
pub mod walker;

/// Resolved property descriptors.
pub mod descriptor;

/// Property descriptor resolution.
pub mod resolver;
