use shell_dispatch::{
    Dispatcher, Event, Lifecycle, LineReader, MemWriter, ParsedCommand, RegistrationError, builtin,
};
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

fn describe(event: &Event<'_>) -> String {
    match event.command() {
        Some(cmd) => format!("{}({})", event.kind(), cmd.name()),
        None => event.kind().to_string(),
    }
}

#[test]
fn test_stock_session_end_to_end() {
    let (output, captured) = MemWriter::with_handle();
    let input = LineReader::from_lines(["debug a b", "frobnicate", "", "quit", "debug"]);
    let mut dispatcher = Dispatcher::new(input, output);
    builtin::install(&mut dispatcher);

    let events = Rc::new(RefCell::new(Vec::new()));
    for kind in Lifecycle::ALL {
        let events = Rc::clone(&events);
        dispatcher.subscribe(kind, move |event, _| {
            events.borrow_mut().push(describe(event));
            Ok(())
        });
    }

    let last = dispatcher.run().expect("dispatch loop should finish");

    assert_eq!(last, Some(ParsedCommand::parse("quit")));
    assert_eq!(
        *events.borrow(),
        vec![
            "Initialize",
            "InitializeFinished",
            "PreCommandExecute(debug)",
            "PostCommandExecute(debug)",
            "PreCommandExecute(frobnicate)",
            "CommandNotFound(frobnicate)",
            "PreCommandExecute()",
            "PostCommandExecute()",
            "PreCommandExecute(quit)",
            "PostCommandExecute(quit)",
            "Exit(quit)",
        ]
    );
    assert_eq!(
        captured.text(),
        "> Hello! I am a command, and I can show you some arguments!\n\
         My arguments are as follows: 'a' 'b'\n\
         Aren't they beautiful?\n\
         > The command 'frobnicate' was not found. Are you missing a registration?\n\
         > > "
    );
}

#[test]
fn test_custom_command_alongside_builtins() {
    let (output, captured) = MemWriter::with_handle();
    let mut dispatcher = Dispatcher::new(LineReader::from_lines(["greet Ada", "exit"]), output);
    builtin::install(&mut dispatcher);
    dispatcher.subscribe(Lifecycle::Initialize, |_, session| {
        session.register_labeled("greet", "tests::greet", |args, session| {
            let name = args.and_then(|args| args.first()).map_or("stranger", String::as_str);
            writeln!(session.output(), "Hello, {name}!")?;
            Ok(())
        })?;
        Ok(())
    });

    dispatcher.run().unwrap();

    assert_eq!(captured.text(), "> Hello, Ada!\n> ");
    assert_eq!(dispatcher.registry().label("greet"), Some("tests::greet"));
}

#[test]
fn test_registration_errors_surface_to_caller() {
    let mut dispatcher = Dispatcher::new(LineReader::from_lines(["quit"]), MemWriter::new());
    builtin::install(&mut dispatcher);
    dispatcher.subscribe(Lifecycle::Initialize, |_, session| {
        session.register("two words", |_, _| Ok(()))?;
        Ok(())
    });

    let err = dispatcher.run().unwrap_err();
    assert_eq!(
        err.root_cause().downcast_ref::<RegistrationError>(),
        Some(&RegistrationError::InvalidName("two words".to_string()))
    );
}
