//! Plugin request/response framing

use prost::Message;
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};
use protoc_gen_cmd_common::{GeneratorError, Result};
use std::io::{self, Read, Write};

/// Decode a `CodeGeneratorRequest` from raw bytes
pub fn decode_request(bytes: &[u8]) -> Result<CodeGeneratorRequest> {
    CodeGeneratorRequest::decode(bytes).map_err(|e| {
        GeneratorError::Io(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("invalid CodeGeneratorRequest: {}", e),
        ))
    })
}

/// Encode a `CodeGeneratorResponse` to bytes
pub fn encode_response(response: &CodeGeneratorResponse) -> Vec<u8> {
    response.encode_to_vec()
}

/// Read the whole input stream and decode it as one request
pub fn read_request<R: Read>(mut reader: R) -> Result<CodeGeneratorRequest> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    tracing::debug!(bytes = buf.len(), "read CodeGeneratorRequest");
    decode_request(&buf)
}

/// Write one response to the output stream and flush it
pub fn write_response<W: Write>(mut writer: W, response: &CodeGeneratorResponse) -> Result<()> {
    let bytes = encode_response(response);
    writer.write_all(&bytes)?;
    writer.flush()?;
    tracing::debug!(bytes = bytes.len(), files = response.file.len(), "wrote CodeGeneratorResponse");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost_types::compiler::code_generator_response;

    #[test]
    fn test_read_request() {
        let request = CodeGeneratorRequest {
            file_to_generate: vec!["game.proto".to_string()],
            parameter: Some("lang=csharp".to_string()),
            ..Default::default()
        };
        let bytes = request.encode_to_vec();

        let decoded = read_request(bytes.as_slice()).unwrap();
        assert_eq!(decoded, request);
        assert_eq!(decoded.parameter(), "lang=csharp");
    }

    #[test]
    fn test_read_garbage_is_io_error() {
        let result = read_request(&[0xff, 0xff, 0xff][..]);
        assert!(matches!(result, Err(GeneratorError::Io(_))));
    }

    #[test]
    fn test_write_response() {
        let response = CodeGeneratorResponse {
            file: vec![code_generator_response::File {
                name: Some("CmdMessageLoader.cs".to_string()),
                content: Some("// empty".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };

        let mut out = Vec::new();
        write_response(&mut out, &response).unwrap();
        assert_eq!(out, response.encode_to_vec());
    }
}
