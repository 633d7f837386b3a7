//! End-to-end tests: WADL fixture in, Go source out

use std::cell::RefCell;
use std::rc::Rc;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use wadlgen_common::{Document, Result};
use wadlgen_generator::{generate_client, ClientGenerator, JsonShapeInferencer, StructInferencer};
use wadlgen_parser::parse_wadl_file;

fn petstore_document() -> Document {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../parser/tests/fixtures/petstore/petstore.wadl");
    parse_wadl_file(&path, None).unwrap().document
}

fn render_petstore() -> String {
    let generator =
        ClientGenerator::new(petstore_document(), "petstore", Box::new(JsonShapeInferencer))
            .unwrap();
    let generated = generator.render().unwrap();
    assert!(generated.diagnostics.is_empty(), "{:?}", generated.diagnostics);
    generated.code
}

/// Records every request and answers with a fixed declaration
struct RecordingInferencer {
    calls: Rc<RefCell<Vec<String>>>,
}

impl StructInferencer for RecordingInferencer {
    fn infer(&self, type_name: &str, _example: &str) -> Result<String> {
        self.calls.borrow_mut().push(type_name.to_string());
        Ok(format!("type {type_name} map[string]interface{{}}\n"))
    }
}

#[test]
fn test_file_header() {
    let code = render_petstore();
    assert!(code.starts_with(
        "package petstore\n\nimport (\n\t\"bytes\"\n\t\"encoding/json\"\n\t\"fmt\"\n\t\"io/ioutil\"\n\t\"net/http\"\n\t\"strings\"\n)\n"
    ));
    assert!(code.contains("type RequestHandlerFn func(*http.Request) (*http.Response, error)\n"));
}

#[test]
fn test_get_pet_function() {
    let code = render_petstore();

    assert!(code.contains("type GetPetParams struct {"));
    assert!(code.contains("\t// Id is required.\n\t//  The pet identifier.\n\tId string `json:\"-\"`"));
    assert!(code.contains("\tXAuthToken string `json:\"-\"`"));
    assert!(code.contains("type GetPetResults struct {\n\t// Name is required.\n\tName string `json:\"name\"`\n}"));

    assert!(code.contains(
        "func getPet(request RequestHandlerFn, args GetPetParams) (*GetPetResults, error) {"
    ));
    assert!(code.contains("url := \"https://api.example.com/v1/pets/%7Bid%7D\""));
    assert!(code.contains("url = strings.Replace(url, \"%7Bid%7D\", args.Id, -1)"));
    assert!(code.contains("req.Header.Set(\"X-Auth-Token\", fmt.Sprintf(\"%v\", args.XAuthToken))"));
    assert!(code.contains("return nil, fmt.Errorf(\"invalid status (%d): %s\", resp.StatusCode, body)"));
    assert!(code.contains("\tcase 200:\n"));
}

#[test]
fn test_list_pets_uses_example_shape() {
    let code = render_petstore();

    assert!(code.contains(
        "type ListPetsResults struct {\n\
         \tPets []struct {\n\
         \t\tAge int `json:\"age\"`\n\
         \t\tId string `json:\"id\"`\n\
         \t\tName string `json:\"name\"`\n\
         \t} `json:\"pets\"`\n\
         }\n"
    ));
    assert!(code.contains("//  \n// Lists every pet.\nfunc listPets("));
    assert!(code.contains("query.Add(\"limit\", fmt.Sprintf(\"%v\", args.Limit))"));
    assert!(code.contains("query.Add(\"marker\", fmt.Sprintf(\"%v\", args.Marker))"));
    assert!(code.contains("\tcase 200,203:\n"));
}

#[test]
fn test_create_widget_nested_params() {
    let code = render_petstore();

    let nested = code.find("type CreateWidgetWidgetParams struct {").unwrap();
    let outer = code.find("type CreateWidgetParams struct {").unwrap();
    assert!(nested < outer);

    assert!(code.contains("\t// Name is required.\n\t//  Display name.\n\tName string `json:\"name\"`"));
    assert!(code.contains("\tSize int `json:\"size,omitempty\"`"));
    assert!(code.contains("\t//  A widget to create.\n\tWidget CreateWidgetWidgetParams `json:\"widget,omitempty\"`"));
    assert!(code.contains("http.NewRequest(\"POST\", url, bytes.NewBuffer(argsAsJson))"));
    assert!(code.contains("\tcase 201,202:\n"));
}

#[test]
fn test_functions_in_name_order() {
    let code = render_petstore();
    let order: Vec<usize> = ["func createWidget(", "func getPet(", "func getStatus(", "func listPets("]
        .iter()
        .map(|f| code.find(f).unwrap())
        .collect();
    assert!(order.windows(2).all(|w| w[0] < w[1]));
    assert!(!code.contains("deletePet"));
}

#[test]
fn test_inferencer_only_sees_methods_with_examples() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let inferencer = RecordingInferencer {
        calls: Rc::clone(&calls),
    };
    let generator = ClientGenerator::new(petstore_document(), "main", Box::new(inferencer))
        .unwrap();
    let code = generator.render().unwrap().code;

    assert_eq!(*calls.borrow(), vec!["ListPetsResults".to_string()]);

    assert!(code.contains("\n\ntype ListPetsResults map[string]interface{}\n"));
    assert!(code.contains("type GetPetResults struct {"));
}

#[test]
fn test_generate_to_file() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("client.go");

    let diagnostics = generate_client(
        petstore_document(),
        "petstore",
        Box::new(JsonShapeInferencer::new()),
        &output,
    )
    .unwrap();
    assert!(diagnostics.is_empty());

    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(written, render_petstore());
}

#[test]
fn test_generate_to_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("missing/client.go");

    let result = generate_client(
        petstore_document(),
        "petstore",
        Box::new(JsonShapeInferencer::new()),
        &output,
    );
    assert!(result.is_err());
}
