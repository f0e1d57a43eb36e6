use naga::valid::{Capabilities, ValidationFlags, Validator};

const SHAPE_WGSL: &str = include_str!("../src/render/shaders/shape.wgsl");

fn parse() -> naga::Module {
    match naga::front::wgsl::parse_str(SHAPE_WGSL) {
        Ok(module) => module,
        Err(e) => panic!("shape.wgsl failed to parse:\n{}", e.emit_to_string(SHAPE_WGSL)),
    }
}

#[test]
fn shape_shader_parses_and_validates() {
    let module = parse();
    let mut validator = Validator::new(ValidationFlags::all(), Capabilities::empty());
    if let Err(e) = validator.validate(&module) {
        panic!("shape.wgsl failed validation: {e:?}");
    }
}

#[test]
fn shape_shader_exposes_both_stages() {
    let module = parse();
    let stages: Vec<_> = module
        .entry_points
        .iter()
        .map(|ep| (ep.name.as_str(), ep.stage))
        .collect();
    assert!(stages.contains(&("vs_main", naga::ShaderStage::Vertex)));
    assert!(stages.contains(&("fs_main", naga::ShaderStage::Fragment)));
}

#[test]
fn vertex_stage_reads_three_vec4_streams() {
    let module = parse();
    let vs = module
        .entry_points
        .iter()
        .find(|ep| ep.name == "vs_main")
        .unwrap();

    let mut locations: Vec<u32> = vs
        .function
        .arguments
        .iter()
        .filter_map(|arg| match &arg.binding {
            Some(naga::Binding::Location { location, .. }) => Some(*location),
            _ => None,
        })
        .collect();

    // Arguments may be wrapped in a struct.
    if locations.is_empty() {
        for arg in &vs.function.arguments {
            if let naga::TypeInner::Struct { members, .. } = &module.types[arg.ty].inner {
                for m in members {
                    if let Some(naga::Binding::Location { location, .. }) = &m.binding {
                        locations.push(*location);
                    }
                }
            }
        }
    }

    locations.sort_unstable();
    assert_eq!(locations, vec![0, 1, 2]);
}
