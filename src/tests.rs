use super::*;
use std::io::Cursor;
use tempfile::TempDir;
use crate::language::ast::SlotId;
use crate::language::token::Literal;

fn output<W: Write>(session: Session<W>) -> W {
    session.into_output()
}

fn script(dir: &TempDir, name: &str, source: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, source).unwrap();
    path
}

mod session {
    use super::*;

    #[test]
    pub fn test_runs_source() {
        let mut session = Session::new(Vec::new(), false);
        session.run("print 1 + 2; print \"a\" + 1;").unwrap();

        assert_eq!("3\na1\n", String::from_utf8(output(session)).unwrap());
    }

    #[test]
    pub fn test_parse_error_runs_nothing() {
        let mut session = Session::new(Vec::new(), false);
        let result = session.run("print 1; print (2; 1 + ;");

        assert!(matches!(result, Err(RunError::Parse { count: 2 })));
        assert!(output(session).is_empty());
    }

    #[test]
    pub fn test_runtime_error() {
        let mut session = Session::new(Vec::new(), false);
        let result = session.run("print 1; print nil + 1;");

        assert!(matches!(result, Err(RunError::Runtime(RuntimeError::Operation { .. }))));
        assert_eq!("1\n", String::from_utf8(output(session)).unwrap());
    }

    #[test]
    pub fn test_print_ast() {
        let mut session = Session::new(Vec::new(), true);
        session.run("var x = 1; print x;").unwrap();

        assert_eq!("(var x 1)\n(print x)\nnil\n", String::from_utf8(output(session)).unwrap());
    }

    #[test]
    pub fn test_slots_persist_between_runs() {
        let mut session = Session::new(Vec::new(), false);
        session.run("x = 1;").unwrap();
        session.run("y = 2;").unwrap();
        session.run("print x;").unwrap();

        // The third run reads a fresh slot, the first two values are kept but unreachable
        assert_eq!("nil\n", String::from_utf8(session.output_mut().clone()).unwrap());

        let interpreter = session.interpreter();
        assert_eq!(Literal::Number(1.0), interpreter.load(SlotId::new(0)));
        assert_eq!(Literal::Number(2.0), interpreter.load(SlotId::new(1)));
        assert_eq!(Literal::Nil, interpreter.load(SlotId::new(2)));
    }
}

mod files {
    use super::*;

    #[test]
    pub fn test_runs_file() {
        let dir = TempDir::new().unwrap();
        let path = script(&dir, "main.krp", "// sum\nprint 40 + 2;\n");

        let mut session = Session::new(Vec::new(), false);
        run_file(&mut session, &path).unwrap();

        assert_eq!("42\n", String::from_utf8(output(session)).unwrap());
    }

    #[test]
    pub fn test_script_errors_are_not_fatal() {
        let dir = TempDir::new().unwrap();
        let path = script(&dir, "broken.krp", "print 1 +;");

        let mut session = Session::new(Vec::new(), false);
        assert!(run_file(&mut session, &path).is_ok());
    }

    #[test]
    pub fn test_rejects_other_extensions() {
        let dir = TempDir::new().unwrap();
        let path = script(&dir, "main.txt", "print 1;");

        let mut session = Session::new(Vec::new(), false);
        assert!(matches!(run_file(&mut session, &path), Err(CliError::InvalidExtension(_))));

        let path = script(&dir, "krp", "print 1;");
        assert!(matches!(run_file(&mut session, &path), Err(CliError::InvalidExtension(_))));

        assert!(output(session).is_empty());
    }

    #[test]
    pub fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.krp");

        let mut session = Session::new(Vec::new(), false);
        assert!(matches!(run_file(&mut session, &path), Err(CliError::Read { .. })));
    }
}

mod prompt {
    use super::*;

    fn run_lines(input: &str) -> String {
        let mut session = Session::new(Vec::new(), false);
        run_prompt(&mut session, Cursor::new(input)).unwrap();
        String::from_utf8(output(session)).unwrap()
    }

    #[test]
    pub fn test_runs_each_line() {
        assert_eq!(">> 1\n>> >> 2\n>> \n[EOF received. Exiting...]\n", run_lines("print 1;\n\nprint 2;\n"));
    }

    #[test]
    pub fn test_exit_commands() {
        assert_eq!(">> 1\n>> [Exiting prompt...]\n", run_lines("print 1;\nexit()\nprint 2;\n"));
        assert_eq!(">> [Exiting prompt...]\n", run_lines("quit()\n"));
    }

    #[test]
    pub fn test_errors_do_not_end_prompt() {
        assert_eq!(">> >> >> 3\n>> [Exiting prompt...]\n", run_lines("print 1 +;\nprint nil + 1;\nprint 3;\nexit()\n"));
    }
}
