//! Output namespace and file naming

use prost_reflect::FileDescriptor;
use protoc_gen_cmd_common::{go_sanitized, underscores_to_camel_case};

/// Namespace the generated code for `file` is placed in
///
/// A non-empty `option csharp_namespace` wins verbatim; otherwise the proto
/// package is PascalCased segment by segment (`game.proto` -> `Game.Proto`).
/// An empty result means the file has no package and no namespace.
pub fn resolve_namespace(file: &FileDescriptor) -> String {
    let override_ns = file
        .file_descriptor_proto()
        .options
        .as_ref()
        .and_then(|options| options.csharp_namespace.as_deref())
        .filter(|ns| !ns.is_empty());

    match override_ns {
        Some(ns) => ns.to_string(),
        None => underscores_to_camel_case(file.package_name(), true, true),
    }
}

/// PascalCased base name of the proto file, without directory or extension
///
/// `protos/login_msg.proto` -> `LoginMsg`
pub fn file_name_base(file: &FileDescriptor) -> String {
    let path = file.name();
    let base = path.rsplit('/').next().unwrap_or(path);
    let stem = base.strip_suffix(".proto").unwrap_or(base);
    underscores_to_camel_case(stem, true, false)
}

/// `option go_package`, if set and non-empty
fn go_package_option(file: &FileDescriptor) -> Option<&str> {
    file.file_descriptor_proto()
        .options
        .as_ref()
        .and_then(|options| options.go_package.as_deref())
        .filter(|go_package| !go_package.is_empty())
}

/// Go import path from `option go_package`, without any `;name` suffix
pub fn go_import_path(file: &FileDescriptor) -> Option<&str> {
    go_package_option(file)
        .map(|go_package| go_package.split_once(';').map_or(go_package, |(path, _)| path))
        .filter(|path| !path.is_empty())
}

/// Name for the Go `package` clause of the code generated from `file`
///
/// `go_package = "example.com/game/protos;gamepb"` gives `gamepb`, and
/// without the `;name` part the last import path element is used. With no
/// `go_package` at all, the proto package (`game.proto` -> `game_proto`),
/// then the file stem, is the fallback.
pub fn resolve_go_package(file: &FileDescriptor) -> String {
    if let Some(go_package) = go_package_option(file) {
        let name = match go_package.split_once(';') {
            Some((_, name)) => name,
            None => go_package.rsplit('/').next().unwrap_or(go_package),
        };
        return go_sanitized(name);
    }

    let package = file.package_name();
    if !package.is_empty() {
        return go_sanitized(package);
    }

    let path = file.name();
    let base = path.rsplit('/').next().unwrap_or(path);
    go_sanitized(base.strip_suffix(".proto").unwrap_or(base))
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost_reflect::DescriptorPool;
    use prost_types::{FileDescriptorProto, FileOptions};

    fn file(name: &str, package: Option<&str>, csharp_namespace: Option<&str>) -> FileDescriptor {
        with_options(
            name,
            package,
            csharp_namespace.map(|ns| FileOptions {
                csharp_namespace: Some(ns.to_string()),
                ..Default::default()
            }),
        )
    }

    fn go_file(name: &str, package: Option<&str>, go_package: Option<&str>) -> FileDescriptor {
        with_options(
            name,
            package,
            go_package.map(|go_package| FileOptions {
                go_package: Some(go_package.to_string()),
                ..Default::default()
            }),
        )
    }

    fn with_options(name: &str, package: Option<&str>, options: Option<FileOptions>) -> FileDescriptor {
        let proto = FileDescriptorProto {
            name: Some(name.to_string()),
            package: package.map(str::to_string),
            options,
            syntax: Some("proto3".to_string()),
            ..Default::default()
        };

        let mut pool = DescriptorPool::new();
        pool.add_file_descriptor_proto(proto).unwrap();
        pool.get_file_by_name(name).unwrap()
    }

    #[test]
    fn test_namespace_from_package() {
        let f = file("game.proto", Some("game.proto"), None);
        assert_eq!(resolve_namespace(&f), "Game.Proto");

        let f = file("inner.proto", Some("my_pkg.sub_pkg"), None);
        assert_eq!(resolve_namespace(&f), "MyPkg.SubPkg");
    }

    #[test]
    fn test_namespace_override_is_verbatim() {
        let f = file("game.proto", Some("game.proto"), Some("Company.game_Protos"));
        assert_eq!(resolve_namespace(&f), "Company.game_Protos");
    }

    #[test]
    fn test_empty_override_falls_back_to_package() {
        let f = file("game.proto", Some("game.proto"), Some(""));
        assert_eq!(resolve_namespace(&f), "Game.Proto");
    }

    #[test]
    fn test_no_package_means_no_namespace() {
        let f = file("bare.proto", None, None);
        assert_eq!(resolve_namespace(&f), "");
    }

    #[test]
    fn test_file_name_base() {
        assert_eq!(file_name_base(&file("protos/login_msg.proto", None, None)), "LoginMsg");
        assert_eq!(file_name_base(&file("game.v2.proto", None, None)), "GameV2");
        assert_eq!(file_name_base(&file("chat", None, None)), "Chat");
    }

    #[test]
    fn test_go_package_from_go_package_option() {
        let f = go_file("game.proto", Some("game.proto"), Some("example.com/game/protos;gamepb"));
        assert_eq!(resolve_go_package(&f), "gamepb");
        assert_eq!(go_import_path(&f), Some("example.com/game/protos"));

        let f = go_file("game.proto", Some("game.proto"), Some("example.com/game/protos"));
        assert_eq!(resolve_go_package(&f), "protos");
        assert_eq!(go_import_path(&f), Some("example.com/game/protos"));
    }

    #[test]
    fn test_go_package_fallbacks() {
        let f = go_file("game.proto", Some("game.proto"), None);
        assert_eq!(resolve_go_package(&f), "game_proto");
        assert_eq!(go_import_path(&f), None);

        let f = go_file("dir/chat-msg.proto", None, None);
        assert_eq!(resolve_go_package(&f), "chat_msg");

        let f = go_file("game.proto", Some("game"), Some(";gamepb"));
        assert_eq!(resolve_go_package(&f), "gamepb");
        assert_eq!(go_import_path(&f), None);
    }
}
