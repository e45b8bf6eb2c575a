/// Name of the discriminator field the compiler injects into contracts that implement a
/// standard interface. It never appears in generated field lists.
pub const STD_ID_FIELD_NAME: &str = "__stdInterfaceId";

/// File holding the per-contract code metadata inside an artifact directory.
pub const PROJECT_ARTIFACT_FILE_NAME: &str = ".project.json";

/// Suffix of compiled contract and script artifacts.
pub const ARTIFACT_EXTENSION: &str = ".ral.json";

/// Delimiters of array type descriptors such as `[[U256;2];3]`.
pub const TYPE_DELIMITERS: [char; 3] = ['[', ';', ']'];

/// Characters of a task id that are not valid in an identifier.
pub const TASK_ID_SEPARATORS: [char; 2] = [':', '-'];
