use std::{fs, time::Duration};

use indoc::indoc;
use kmsl::{
    RunReport, Session,
    error::DiagnosticKind,
    interpreter::value::Value,
    io::{Event, Recorder, Services},
    run,
};
use walkdir::WalkDir;

#[test]
fn script_corpus_matches_expected_output() {
    let mut count = 0;

    for entry in
        WalkDir::new("tests/scripts").into_iter()
                                     .filter_map(Result::ok)
                                     .filter(|e| e.path().extension().is_some_and(|ext| ext == "kmsl"))
    {
        let path = entry.path();
        let source =
            fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {path:?}: {e}"));
        let expected_path = path.with_extension("out");
        let expected = fs::read_to_string(&expected_path).unwrap_or_else(|e| {
                                                             panic!("Failed to read \
                                                                     {expected_path:?}: {e}")
                                                         });

        count += 1;
        let recorder = Recorder::new();
        let report = run(&source, Services::recording(&recorder));
        assert!(!report.has_errors(),
                "Script {path:?} failed:\n{source}\n{}",
                report.rendered);
        assert_eq!(recorder.output(),
                   expected.lines().collect::<Vec<_>>(),
                   "Script {path:?} printed unexpected output");
    }

    assert!(count > 0, "No scripts found in tests/scripts");
}

fn assert_success(src: &str) -> Recorder {
    let recorder = Recorder::new();
    let report = run(src, Services::recording(&recorder));
    if report.has_errors() {
        panic!("Script failed:\n{}", report.rendered);
    }
    recorder
}

fn assert_failure(src: &str) -> (Recorder, RunReport) {
    let recorder = Recorder::new();
    let report = run(src, Services::recording(&recorder));
    if !report.has_errors() {
        panic!("Script succeeded but was expected to fail")
    }
    (recorder, report)
}

fn assert_prints(src: &str, expected: &[&str]) {
    assert_eq!(assert_success(src).output(), expected, "for script:\n{src}");
}

fn kinds(report: &RunReport) -> Vec<DiagnosticKind> {
    report.diagnostics.iter().map(|d| d.kind).collect()
}

#[test]
fn division_always_yields_a_float() {
    assert_prints("a = 3 / 2\nprint a", &["1.5"]);
    assert_prints("print 4 / 2", &["2"]);
    assert_prints("print 7 // 2\nprint -7 // 2", &["3", "-4"]);
    assert_prints("print 7 % 3", &["1"]);
}

#[test]
fn a_while_loop_computes_a_factorial() {
    assert_prints(indoc! {"
        n = 5
        fact = 1
        while(n>0){
        fact *= n
        n--
        }
        print fact
    "},
                  &["120"]);
}

#[test]
fn break_leaves_only_the_innermost_loop() {
    assert_prints("for (i = 0, i < 3, i++) { if (i == 1) { break } print i }",
                  &["0"]);
    assert_prints(indoc! {"
        for (i = 0, i < 3, i++) {
            for (j = 0, j < 3, j++) {
                if j == 1 { break }
                print i
            }
        }
    "},
                  &["0", "1", "2"]);
}

#[test]
fn continue_skips_the_rest_of_one_pass() {
    assert_prints(indoc! {"
        i = 0
        while i < 5 {
            i++
            if i % 2 == 0 {
                continue
            }
            print i
        }
    "},
                  &["1", "3", "5"]);
}

#[test]
fn loop_control_outside_a_loop_is_rejected_before_running() {
    let (recorder, report) = assert_failure("print 1\nbreak");
    assert_eq!(kinds(&report), [DiagnosticKind::Semantic]);
    assert!(recorder.output().is_empty());

    let (_, report) = assert_failure("if true {\n    continue\n}");
    assert_eq!(kinds(&report), [DiagnosticKind::Semantic]);
}

#[test]
fn strings_repeat_and_concatenate() {
    assert_prints("a = \"hi\" * 3\nprint a", &["hihihi"]);
    assert_prints("print 2 * \"ab\" + \"!\"", &["abab!"]);
    assert_prints("print \"apple\" < \"banana\"", &["true"]);
    assert_prints("print len \"four\"", &["4"]);
}

#[test]
fn negative_repetition_reports_and_continues() {
    let (recorder, report) = assert_failure("a = \"hi\" * -1\nprint a\nprint \"after\"");

    assert_eq!(kinds(&report), [DiagnosticKind::Runtime]);
    assert!(report.executed);
    assert_eq!(recorder.output(), ["hi", "after"]);
}

#[test]
fn oversized_repetition_reports_and_continues() {
    let (recorder, report) = assert_failure(indoc! {r#"
        a = "ab" * 9223372036854775807
        b = 100000000000 * "a"
        print a + b
        print "after"
    "#});

    assert_eq!(kinds(&report), [DiagnosticKind::Runtime; 2]);
    assert!(report.diagnostics[0].message.starts_with("string would be longer than"));
    assert_eq!(recorder.output(), ["aba", "after"]);
}

#[test]
fn domain_errors_yield_fallbacks() {
    let (recorder, report) = assert_failure(indoc! {"
        print 1 / 0
        print 5 % 0
        print 0 ^^ 2
        print 1 > 0
    "});

    assert_eq!(kinds(&report), [DiagnosticKind::Runtime; 3]);
    assert_eq!(recorder.output(), ["0", "0", "0", "true"]);
}

#[test]
fn an_unmatched_brace_stops_everything() {
    let (recorder, report) = assert_failure("print 1\nwhile true {\n    print 2\n");

    assert_eq!(kinds(&report), [DiagnosticKind::Syntax]);
    assert!(report.diagnostics[0].message.contains("'{'"));
    assert!(!report.executed);
    assert!(recorder.output().is_empty());
}

#[test]
fn syntax_errors_are_collected_across_statements() {
    let (_, report) = assert_failure("x = 1 +\ny = 2\nz = * 3");

    assert!(report.diagnostics.len() >= 2);
    assert!(kinds(&report).iter().all(|&k| k == DiagnosticKind::Syntax));
}

#[test]
fn unmatched_characters_are_syntax_errors_unless_lenient() {
    let (_, report) = assert_failure("x = 1 $");
    assert_eq!(kinds(&report), [DiagnosticKind::Syntax]);

    let recorder = Recorder::new();
    let mut session = Session::new(Services::recording(&recorder),
                                   kmsl::Config { interactive:   false,
                                                  strict_lexing: false, });
    let report = session.run("x = 2 $\nprint x");
    assert!(!report.has_errors(), "{}", report.rendered);
    assert_eq!(recorder.output(), ["2"]);
}

#[test]
fn compound_assignment_matches_the_long_form() {
    let operators = ["+", "-", "*", "/", "%", "//", "**", "%%", "^^", "&", "|", "^", "<<", ">>"];
    for op in operators {
        let short = assert_success(&format!("x = 12\nx {op}= 3\nprint x"));
        let long = assert_success(&format!("x = 12\nx = x {op} 3\nprint x"));
        assert_eq!(short.output(), long.output(), "for operator {op}");
    }

    assert_prints("x = 16\ny = 2\nx %%= y\nprint x\nx ^^= y\nprint x", &["4", "2"]);
    assert_prints("s = \"a\"\ns += \"b\"\nprint s", &["ab"]);
}

#[test]
fn compound_assignment_needs_a_declared_variable() {
    let (_, report) = assert_failure("total += 1");
    assert_eq!(kinds(&report), [DiagnosticKind::Semantic]);
}

#[test]
fn undeclared_variables_are_semantic_errors() {
    let (recorder, report) = assert_failure("print 1\nprint y + 1");

    assert_eq!(report.diagnostics[0].message, "undeclared variable 'y'");
    assert!(recorder.output().is_empty());
}

#[test]
fn non_boolean_conditions_are_rejected_statically() {
    let (_, report) = assert_failure("if 1 + 1 { print 1 }");
    assert_eq!(kinds(&report), [DiagnosticKind::Semantic]);
}

#[test]
fn block_bindings_end_with_their_block() {
    let (recorder, report) = assert_failure(indoc! {"
        if true {
            inner = 1
            print inner
        }
        print inner
    "});

    assert_eq!(kinds(&report), [DiagnosticKind::Semantic]);
    assert!(recorder.output().is_empty());

    assert_prints(indoc! {"
        outer = 1
        if true {
            outer = 2
        }
        print outer
    "},
                  &["2"]);
}

#[test]
fn increments_work_in_both_positions() {
    assert_prints("n = 1\nn++\n++n\nprint n\nn--\nprint n", &["3", "2"]);
}

#[test]
fn else_may_follow_blank_lines() {
    assert_prints(indoc! {"
        if false {
            print 1
        }

        else {
            print 2
        }
    "},
                  &["2"]);
}

#[test]
fn exit_stops_the_program() {
    let recorder = assert_success(indoc! {"
        for (i = 0, i < 10, i++) {
            if i == 2 { exit }
            print i
        }
        print \"unreachable\"
    "});

    assert_eq!(recorder.output(), ["0", "1"]);
}

#[test]
fn comments_end_statements() {
    assert_prints("x = 1 # one\nprint x # print it", &["1"]);
}

#[test]
fn do_runs_a_nested_program() {
    assert_prints(indoc! {r#"
        code = "print 1\nprint 2"
        do code
        do "nested = 40"
        x = 2
        do "print x + 40"
    "#},
                  &["1", "2", "42"]);
}

#[test]
fn a_program_running_itself_is_cut_off() {
    let (recorder, report) = assert_failure("s = \"do s\"\ndo s\nprint \"after\"");

    assert_eq!(kinds(&report), [DiagnosticKind::Runtime]);
    assert_eq!(recorder.output(), ["after"]);
}

#[test]
fn files_round_trip_through_the_file_system() {
    let recorder = assert_success(indoc! {r#"
        writefile "notes.txt", "one"
        appendfile "notes.txt", " two"
        copy "notes.txt", "backup.txt"
        rename "backup.txt", "old.txt"
        createdir "logs"
        print readfile "old.txt"
        print exists "backup.txt"
        print exists "logs"
    "#});

    assert_eq!(recorder.output(), ["one two", "false", "true"]);
    assert_eq!(recorder.file("notes.txt").as_deref(), Some("one two"));
    assert!(recorder.has_dir("logs"));
}

#[test]
fn reading_a_missing_file_fails_the_statement_only() {
    let (recorder, report) = assert_failure("print readfile \"missing.txt\"\nprint 1");

    assert_eq!(kinds(&report), [DiagnosticKind::Runtime]);
    assert_eq!(recorder.output(), ["1"]);
}

#[test]
fn device_actions_reach_the_device() {
    let recorder = assert_success(indoc! {r#"
        hold "SHIFT"
        press "A", 0.5
        release "SHIFT"
        move 100, 200
        wait 1.5
        os "echo done"
    "#});

    assert_eq!(recorder.events(),
               [Event::Hold(vec!["SHIFT".to_string()]),
                Event::Press { buttons:  vec!["A".to_string()],
                               duration: Duration::from_millis(500), },
                Event::Release(vec!["SHIFT".to_string()]),
                Event::MoveTo { x:        100,
                                y:        200,
                                duration: Duration::ZERO, },
                Event::Sleep(Duration::from_millis(1500)),
                Event::Command("echo done".to_string())]);
}

#[test]
fn type_rejects_non_strings() {
    let (recorder, report) = assert_failure("type 42\nprint \"still running\"");

    assert_eq!(kinds(&report), [DiagnosticKind::Runtime]);
    assert_eq!(recorder.output(), ["still running"]);
}

#[test]
fn input_converts_to_the_variables_type() {
    let recorder = Recorder::with_input(&["41", "yes"]);
    let report = run("n = 0\ninput n\nprint n + 1\nflag = false\ninput flag\nprint flag",
                     Services::recording(&recorder));

    assert_eq!(kinds(&report), [DiagnosticKind::Runtime]);
    assert_eq!(recorder.output(), ["42", "false"]);
}

#[test]
fn interactive_sessions_remember_variables() {
    let recorder = Recorder::new();
    let mut session = Session::interactive(Services::recording(&recorder));

    assert!(!session.run("a = 3 / 2").has_errors());
    assert!(!session.run("b = a * 2").has_errors());
    assert!(!session.run("b").has_errors());
    assert!(!session.run("print a").has_errors());

    assert_eq!(session.get("a"), Some(&Value::Float(1.5)));
    assert_eq!(recorder.output(), ["3", "1.5"]);
}

#[test]
fn rendering_points_at_the_offending_token() {
    let (_, report) = assert_failure("x = 1\ny = x + zz\n");

    assert_eq!(report.rendered,
               "1 error(s) found\n\n[SEMANTIC_ERROR][2] undeclared variable 'zz'\ny = x + \
                zz\n~~~~~~~~~^\n");
}
