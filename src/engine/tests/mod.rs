use super::test_helpers::*;
use super::*;
use crate::error::{Error, ErrorCode, RemoteError};
use crate::types::{CreatedTask, RemoteTask, Status};
