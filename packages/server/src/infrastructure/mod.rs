//! Infrastructure 層
//!
//! ドメイン層が定義する trait の具体的な実装と、ワイヤーフォーマットの DTO。

pub mod dto;
pub mod registry;
pub mod transport;
