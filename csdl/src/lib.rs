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

//! CSDL schema type-graph resolution for Redfish services.
//!
//! The crate loads EDMX documents ([`edmx`]) from a schema directory or
//! from the service itself, follows `edmx:Reference` declarations
//! across documents and resolves properties of entity and complex
//! types into [`PropertyDescriptor`]s that describe what a payload
//! value must look like.
//!
//! ```text
//! DocumentCache -> ReferenceIndex -> TypeWalker -> Resolver
//! ```

/// EDMX format parser and validator.
pub mod edmx;

/// Helpers for OData and Redfish annotations.
pub mod annotations;

/// Schema documents, caching and type resolution.
pub mod schema;

mod error;

#[doc(inline)]
pub use error::Error;
#[doc(inline)]
pub use schema::cache::CacheConfig;
#[doc(inline)]
pub use schema::cache::DocumentCache;
#[doc(inline)]
pub use schema::descriptor::PropertyDescriptor;
#[doc(inline)]
pub use schema::descriptor::PropertyMap;
#[doc(inline)]
pub use schema::descriptor::PropertyPath;
#[doc(inline)]
pub use schema::descriptor::RealType;
#[doc(inline)]
pub use schema::document::SchemaDocument;
#[doc(inline)]
pub use schema::references::ReferenceEntry;
#[doc(inline)]
pub use schema::references::ReferenceIndex;
#[doc(inline)]
pub use schema::resolver::Resolver;
#[doc(inline)]
pub use schema::walker::TypeKind;
#[doc(inline)]
pub use schema::walker::TypeLocation;
#[doc(inline)]
pub use schema::walker::TypeWalker;
